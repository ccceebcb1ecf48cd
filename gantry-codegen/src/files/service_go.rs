use std::path::{Path, PathBuf};

use gantry_core::{FileRules, GeneratedFile, NameCase, SENTINEL};
use gantry_resolve::ResolvedContract;

use crate::CodeBuilder;

/// The machine-owned service interface file for one resolved contract.
///
/// Carries the interface declaration plus the registration lookup keyed by
/// type name: a `local` slot, an accessor that panics until an
/// implementation registers itself, and the `Register` entry point called
/// from hand-written logic packages.
pub struct ServiceGo<'a> {
    contract: &'a ResolvedContract,
    name_case: NameCase,
}

impl<'a> ServiceGo<'a> {
    pub fn new(contract: &'a ResolvedContract, name_case: NameCase) -> Self {
        Self {
            contract,
            name_case,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.go", self.name_case.apply(&self.contract.type_name))
    }
}

impl GeneratedFile for ServiceGo<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(self.file_name())
    }

    fn rules(&self) -> FileRules {
        FileRules::default()
    }

    fn render(&self) -> String {
        let name = &self.contract.type_name;
        CodeBuilder::new()
            .line(SENTINEL)
            .blank()
            .line("package service")
            .blank()
            .block("type (", ")", |b| {
                b.block(&format!("I{} interface {{", name), "}", |b| {
                    b.each(&self.contract.methods, |b, m| b.line(&m.signature.render()))
                })
            })
            .blank()
            .block("var (", ")", |b| b.line(&format!("local{} I{}", name, name)))
            .blank()
            .block(&format!("func {}() I{} {{", name, name), "}", |b| {
                b.block(&format!("if local{} == nil {{", name), "}", |b| {
                    b.line(&format!(
                        "panic(\"implement not found for interface I{}, forgot register?\")",
                        name
                    ))
                })
                .line(&format!("return local{}", name))
            })
            .blank()
            .block(&format!("func Register{}(i I{}) {{", name, name), "}", |b| {
                b.line(&format!("local{} = i", name))
            })
            .build()
    }
}
