pub mod credential;
pub mod digest;
pub mod rng;

pub use credential::{hash_credential, Credential, UserHash};
pub use digest::{sha256_hex, to_hex};
pub use rng::{GraphRng, GRAPH_RNG_VERSION};
