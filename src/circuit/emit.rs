use std::fmt::Write;

use crate::circuit::spec::{CircuitSpec, Constraint, Param, Visibility};

/// Renders a [`CircuitSpec`] as program text for a proving backend.
pub trait CircuitEmitter {
    fn emit(&self, spec: &CircuitSpec) -> String;
}

/// ZoKrates source using the packed SHA-256 gadget for the hash binding.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZokratesEmitter;

const SHA256_IMPORT: &str = r#"import "hashes/sha256/512bitPacked" as sha256packed;"#;

impl ZokratesEmitter {
    fn param(param: &Param) -> String {
        let visibility = match param.visibility {
            Visibility::Private => "private ",
            Visibility::Public => "",
        };
        let dims: String = param.dims.iter().map(|d| format!("[{d}]")).collect();
        format!("{visibility}field{dims} {}", param.name)
    }
}

impl CircuitEmitter for ZokratesEmitter {
    fn emit(&self, spec: &CircuitSpec) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{SHA256_IMPORT}");
        let _ = writeln!(out);

        let params: Vec<String> = spec.params().iter().map(Self::param).collect();
        let _ = writeln!(out, "def main(");
        let _ = writeln!(out, "    {}", params.join(",\n    "));
        let _ = writeln!(out, ") {{");

        let mut section = None;
        for constraint in spec.constraints() {
            let kind = std::mem::discriminant(constraint);
            if section.is_some_and(|prev| prev != kind) {
                let _ = writeln!(out);
            }
            section = Some(kind);

            match *constraint {
                Constraint::ColorDomain { node } => {
                    let _ = writeln!(
                        out,
                        "    assert(colors[{node}] * (colors[{node}] - 1) * (colors[{node}] - 2) == 0);"
                    );
                }
                Constraint::EdgeDistinct { u, v } => {
                    let _ = writeln!(out, "    assert(colors[{u}] != colors[{v}]);");
                }
                Constraint::HashBinding => {
                    let _ = writeln!(out, "    field[2] computed_hash = sha256packed(hash_input);");
                    let _ = writeln!(out, "    assert(computed_hash[0] == stored_hash[0]);");
                    let _ = writeln!(out, "    assert(computed_hash[1] == stored_hash[1]);");
                }
            }
        }

        let _ = writeln!(out, "    return;");
        let _ = writeln!(out, "}}");
        out
    }
}
