pub mod emit;
pub mod field;
pub mod inputs;
pub mod spec;

pub use emit::{CircuitEmitter, ZokratesEmitter};
pub use field::{FieldElement, FieldParseError};
pub use inputs::{expected_len, stored_hash_for, CircuitInputs, EncodingError};
pub use spec::{CircuitSpec, Constraint, Param, Violation, Visibility};
