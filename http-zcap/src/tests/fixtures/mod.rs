mod capabilities;
mod signers;

pub use capabilities::*;
pub use signers::*;

pub const TEST_URL: &str = "https://www.test.org/read/foo";
pub const TEST_ROOT_CAPABILITY: &str =
    "urn:zcap:root:https%3A%2F%2Fwww.test.org%2Fread%2Ffoo";
pub const TEST_DATE: &str = "Tue, 07 Jun 2022 20:51:35 GMT";
pub const TEST_CREATED: u64 = 1_654_635_095;
