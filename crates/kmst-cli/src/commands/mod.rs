pub mod bench;
pub mod generate;
pub mod solve;
pub mod stats;
pub mod util;
