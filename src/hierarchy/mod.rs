pub mod bounds;
pub mod hit_test;
pub mod node;
pub mod parser;
pub mod search;
pub mod tree;

pub use bounds::{format_bounds, parse_bounds};
pub use hit_test::hit_test;
pub use node::{NodeId, UiNode};
pub use parser::parse;
pub use tree::Hierarchy;
