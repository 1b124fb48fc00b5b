//! Team relationship network visualizer: force-directed layout, pointer
//! interaction, and canvas rendering behind one Leptos component.

mod component;
mod interaction;
mod palette;
mod render;
mod sim;
mod types;

pub use component::NetworkGraphCanvas;
pub use types::{NetworkData, NetworkEdge, NetworkNode, RelationshipKind};
