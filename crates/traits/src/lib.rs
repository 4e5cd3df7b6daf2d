pub mod dom;
pub mod memory;
pub mod registry;
pub mod subscription;

pub use dom::{Dom, DomError, NavigationTarget, ScrollBehavior};
pub use memory::{InMemoryDom, NodeId, ScrollRequest};
pub use registry::{IdRegistry, InMemoryIdRegistry};
pub use subscription::Subscription;
