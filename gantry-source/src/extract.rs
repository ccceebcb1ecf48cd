//! Declaration-surface parsing for Go source trees.
//!
//! Implementation structs are recognized by a configurable name pattern
//! (default `^s([A-Z]\w*)$`, so `sUser` yields the contract name `User`).
//! Method heads are matched textually and normalized before parsing, so
//! multi-line signatures collapse to a single canonical form.

use std::{
    fs,
    path::{Path, PathBuf},
};

use gantry_core::to_pascal_case;
use indexmap::IndexMap;
use regex::Regex;

use crate::{
    error::ExtractionError,
    symbol::{CompositionEdge, EdgeKind, MethodSignature, Param, TypeSymbol, Visibility},
};

const DEFAULT_STRUCT_PATTERN: &str = r"^s([A-Z]\w*)$";

/// Go keywords that can open a type expression; a segment starting with one
/// of these is a bare type, never a `name type` pair.
const TYPE_KEYWORDS: &[&str] = &["chan", "func", "interface", "map", "struct"];

/// Read-only extractor over a source directory.
pub struct Extractor {
    src_dir: PathBuf,
    pattern: Regex,
    struct_re: Regex,
    func_re: Regex,
    tag_re: Regex,
}

impl Extractor {
    /// Create an extractor with the default implementation-struct pattern.
    pub fn new(src_dir: impl Into<PathBuf>) -> Self {
        Self::with_pattern(src_dir, DEFAULT_STRUCT_PATTERN)
            .expect("default struct pattern is valid")
    }

    /// Create an extractor with a custom struct name pattern. The first
    /// capture group becomes the contract name.
    pub fn with_pattern(
        src_dir: impl Into<PathBuf>,
        pattern: &str,
    ) -> Result<Self, Box<ExtractionError>> {
        let compiled = Regex::new(pattern).map_err(|e| {
            Box::new(ExtractionError::InvalidPattern {
                pattern: pattern.to_string(),
                source: e,
            })
        })?;
        Ok(Self {
            src_dir: src_dir.into(),
            pattern: compiled,
            struct_re: Regex::new(r"(?m)^type\s+(\w+)\s+struct\s*\{")
                .expect("struct regex is valid"),
            func_re: Regex::new(r"(?s)func\s+\((.*?)\)\s+(.*?)\s*\{").expect("func regex is valid"),
            tag_re: Regex::new(r"(?m)^//\s*gen:(\w+)=(\S+)\s*$").expect("tag regex is valid"),
        })
    }

    /// Extract all implementation types, or only the named one.
    ///
    /// An unknown filter simply yields an empty set; callers decide whether
    /// that is fatal for a targeted run.
    pub fn extract(&self, filter: Option<&str>) -> Result<Vec<TypeSymbol>, Box<ExtractionError>> {
        let mut files = Vec::new();
        collect_go_files(&self.src_dir, &mut files)?;
        files.sort();

        let mut symbols: IndexMap<String, TypeSymbol> = IndexMap::new();
        for file in &files {
            let content =
                fs::read_to_string(file).map_err(|e| ExtractionError::io(file.clone(), e))?;
            self.parse_file(file, &content, &mut symbols)?;
        }

        let mut result: Vec<TypeSymbol> = symbols.into_values().collect();
        if let Some(name) = filter {
            result.retain(|s| s.name == name);
        }
        Ok(result)
    }

    /// Map an implementation struct name to its contract name, if the name
    /// matches the configured pattern.
    fn contract_name(&self, struct_name: &str) -> Option<String> {
        self.pattern
            .captures(struct_name)
            .and_then(|c| c.get(1))
            .map(|m| to_pascal_case(m.as_str()))
    }

    fn parse_file(
        &self,
        path: &Path,
        content: &str,
        symbols: &mut IndexMap<String, TypeSymbol>,
    ) -> Result<(), Box<ExtractionError>> {
        let filename = path.display().to_string();

        // Struct declarations first so composition edges and tags are
        // registered even for types that declare no methods.
        for caps in self.struct_re.captures_iter(content) {
            let struct_name = &caps[1];
            let Some(contract) = self.contract_name(struct_name) else {
                continue;
            };
            let decl = caps.get(0).expect("regex match has a full capture");
            let tags = self.parse_tags(content, decl.start());
            let compositions =
                self.parse_struct_body(content, &filename, decl.end(), &contract)?;

            let symbol = symbols.entry(contract.clone()).or_insert_with(|| TypeSymbol {
                name: contract.clone(),
                source_path: path.to_path_buf(),
                methods: Vec::new(),
                compositions: Vec::new(),
                tags: IndexMap::new(),
            });
            symbol.compositions.extend(compositions);
            symbol.tags.extend(tags);
        }

        // Method declarations, in file order.
        for caps in self.func_re.captures_iter(content) {
            let receiver = caps[1].trim();
            let struct_name = receiver
                .split_whitespace()
                .last()
                .unwrap_or(receiver)
                .trim_start_matches('*');
            let Some(contract) = self.contract_name(struct_name) else {
                continue;
            };
            let head = normalize_head(&caps[2]);
            let Some(signature) = parse_method_head(&head) else {
                let m = caps.get(2).expect("regex match has a head capture");
                return Err(ExtractionError::unsupported(
                    content,
                    &filename,
                    (m.start(), m.len()),
                    format!("cannot parse method head '{}'", head),
                ));
            };

            let symbol = symbols.entry(contract.clone()).or_insert_with(|| TypeSymbol {
                name: contract.clone(),
                source_path: path.to_path_buf(),
                methods: Vec::new(),
                compositions: Vec::new(),
                tags: IndexMap::new(),
            });
            symbol.methods.push(signature);
        }

        Ok(())
    }

    /// Collect `// gen:key=value` doc tags immediately above a declaration.
    fn parse_tags(&self, content: &str, decl_start: usize) -> IndexMap<String, String> {
        let mut tags = IndexMap::new();
        let mut lines: Vec<&str> = content[..decl_start].lines().collect();
        while let Some(line) = lines.pop() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(caps) = self.tag_re.captures(trimmed) {
                tags.insert(caps[1].to_string(), caps[2].to_string());
                continue;
            }
            break;
        }
        tags.reverse();
        tags
    }

    /// Parse a struct body into composition edges, starting right after the
    /// opening brace. Named fields are plain data and produce no edge;
    /// embedded types produce `Contain` edges, or `Extend` when tagged
    /// `gen:"extend"`.
    fn parse_struct_body(
        &self,
        content: &str,
        filename: &str,
        body_start: usize,
        owner: &str,
    ) -> Result<Vec<CompositionEdge>, Box<ExtractionError>> {
        let mut edges = Vec::new();
        let mut offset = body_start;
        let body = &content[body_start..];

        for line in body.lines() {
            let line_start = offset;
            offset += line.len() + 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }
            if trimmed == "}" {
                return Ok(edges);
            }
            if trimmed.contains('{') {
                return Err(ExtractionError::unsupported(
                    content,
                    filename,
                    (line_start, line.len()),
                    "nested anonymous type inside struct body",
                ));
            }

            let (decl, tag) = split_field_tag(trimmed);
            let decl = strip_line_comment(decl).trim();
            if decl.is_empty() {
                continue;
            }

            let tokens: Vec<&str> = decl.split_whitespace().collect();
            match tokens.as_slice() {
                // Embedded type: a composition edge.
                [embedded] => {
                    let local = embedded
                        .trim_start_matches('*')
                        .rsplit('.')
                        .next()
                        .unwrap_or(embedded);
                    if !is_identifier(local) {
                        return Err(ExtractionError::unsupported(
                            content,
                            filename,
                            (line_start, line.len()),
                            format!("cannot classify field declaration '{}'", trimmed),
                        ));
                    }
                    let composed = self.contract_name(local).unwrap_or_else(|| local.to_string());
                    let kind = if tag.contains(r#"gen:"extend""#) {
                        EdgeKind::Extend
                    } else {
                        EdgeKind::Contain
                    };
                    edges.push(CompositionEdge {
                        owner: owner.to_string(),
                        composed,
                        kind,
                    });
                }
                // Named field(s): plain data, validated but not recorded.
                [name, rest @ ..] if is_identifier(name) && !rest.is_empty() => {}
                _ => {
                    return Err(ExtractionError::unsupported(
                        content,
                        filename,
                        (line_start, line.len()),
                        format!("cannot classify field declaration '{}'", trimmed),
                    ));
                }
            }
        }

        // Unterminated struct body.
        Err(ExtractionError::unsupported(
            content,
            filename,
            (body_start.saturating_sub(1), 1),
            "unterminated struct body",
        ))
    }
}

fn collect_go_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), Box<ExtractionError>> {
    let entries = fs::read_dir(dir).map_err(|e| ExtractionError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ExtractionError::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            collect_go_files(&path, out)?;
        } else if path.extension().is_some_and(|e| e == "go")
            && !path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().ends_with("_test.go"))
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Collapse a possibly multi-line method head to one canonical line.
fn normalize_head(raw: &str) -> String {
    let mut head = raw.replace('\n', " ");
    head = head.replace(",)", ")");
    let mut collapsed = String::with_capacity(head.len());
    let mut last_space = false;
    for c in head.chars() {
        if c.is_whitespace() {
            if !last_space {
                collapsed.push(' ');
            }
            last_space = true;
        } else {
            if c == ')' && collapsed.ends_with(", ") {
                collapsed.truncate(collapsed.len() - 2);
            }
            collapsed.push(c);
            last_space = false;
        }
    }
    collapsed.replace("( ", "(").trim().to_string()
}

/// Parse a normalized method head like
/// `Get(ctx context.Context, id int64) (*entity.User, error)`.
fn parse_method_head(head: &str) -> Option<MethodSignature> {
    let open = head.find('(')?;
    let name = head[..open].trim();
    if !is_identifier(name) {
        return None;
    }
    let close = matching_paren(head, open)?;
    let params = parse_params(&head[open + 1..close]);
    let results = parse_results(head[close + 1..].trim());

    let visibility = if name.chars().next().is_some_and(char::is_uppercase) {
        Visibility::Exported
    } else {
        Visibility::Unexported
    };
    Some(MethodSignature {
        name: name.to_string(),
        params,
        results,
        visibility,
    })
}

fn parse_params(s: &str) -> Vec<Param> {
    let segments = split_top_level(s);
    let mut params: Vec<Param> = Vec::new();
    let mut carried_type: Option<String> = None;

    // Right to left so grouped names ("a, b int") pick up the shared type.
    for seg in segments.iter().rev() {
        let seg = seg.trim();
        if seg.is_empty() {
            continue;
        }
        match seg.split_once(char::is_whitespace) {
            Some((first, rest))
                if is_identifier(first) && !TYPE_KEYWORDS.contains(&first) =>
            {
                let ty = rest.trim().to_string();
                carried_type = Some(ty.clone());
                params.push(Param {
                    name: first.to_string(),
                    ty,
                });
            }
            Some(_) => {
                // Keyword-led type expression, e.g. `chan int`.
                carried_type = None;
                params.push(Param {
                    name: String::new(),
                    ty: seg.to_string(),
                });
            }
            None => {
                if let Some(ty) = carried_type.clone().filter(|_| is_identifier(seg)) {
                    params.push(Param {
                        name: seg.to_string(),
                        ty,
                    });
                } else {
                    carried_type = None;
                    params.push(Param {
                        name: String::new(),
                        ty: seg.to_string(),
                    });
                }
            }
        }
    }
    params.reverse();
    params
}

fn parse_results(s: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }
    if let Some(inner) = s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        split_top_level(inner)
            .into_iter()
            .map(|seg| result_type(seg.trim()))
            .filter(|t| !t.is_empty())
            .collect()
    } else {
        vec![s.to_string()]
    }
}

/// Strip a result name from a `name type` segment, keeping bare types as is.
fn result_type(seg: &str) -> String {
    match seg.split_once(char::is_whitespace) {
        Some((first, rest)) if is_identifier(first) && !TYPE_KEYWORDS.contains(&first) => {
            rest.trim().to_string()
        }
        _ => seg.to_string(),
    }
}

/// Split on commas that sit outside any bracket pair.
fn split_top_level(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in s.chars() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    if !current.trim().is_empty() {
        parts.push(current);
    }
    parts
}

fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s[open..].char_indices().map(|(i, c)| (i + open, c)) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn split_field_tag(line: &str) -> (&str, &str) {
    match line.find('`') {
        Some(start) => {
            let rest = &line[start + 1..];
            let end = rest.find('`').map_or(rest.len(), |e| e);
            (&line[..start], &rest[..end])
        }
        None => (line, ""),
    }
}

fn strip_line_comment(s: &str) -> &str {
    match s.find("//") {
        Some(pos) => &s[..pos],
        None => s,
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
