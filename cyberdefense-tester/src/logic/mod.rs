pub mod policy;
pub mod reports;
pub mod tester;

pub use policy::PlayerStrategy;
pub use tester::{LogicTester, RunResult};
