use leptos::prelude::*;

use crate::components::network_graph::{
	NetworkData, NetworkEdge, NetworkGraphCanvas, NetworkNode, RelationshipKind,
};

/// Sample team snapshot; stands in for the dashboard's data layer.
fn sample_team() -> NetworkData {
	let member = |id: &str, label: &str, influence: f64| NetworkNode {
		id: id.into(),
		label: label.into(),
		influence,
	};
	let rel = |source: &str, target: &str, kind: RelationshipKind, strength: f64| NetworkEdge {
		source: source.into(),
		target: target.into(),
		kind,
		strength,
	};

	NetworkData {
		nodes: vec![
			member("mei", "Mei Tanaka", 84.0),
			member("jonas", "Jonas Berg", 61.0),
			member("priya", "Priya Nair", 72.0),
			member("sam", "Sam Okafor", 38.0),
			member("lena", "Lena Fischer", 55.0),
			member("diego", "Diego Ramos", 29.0),
			member("alice", "Alice Chen", 47.0),
			member("tom", "Tom Novak", 18.0),
		],
		edges: vec![
			rel("mei", "jonas", RelationshipKind::Influences, 0.8),
			rel("mei", "priya", RelationshipKind::AlignedWith, 0.7),
			rel("priya", "sam", RelationshipKind::Mentors, 0.9),
			rel("jonas", "lena", RelationshipKind::TensionWith, 0.4),
			rel("lena", "priya", RelationshipKind::DefersTo, 0.5),
			rel("diego", "jonas", RelationshipKind::Supports, 0.6),
			rel("alice", "mei", RelationshipKind::CompetesWith, 0.3),
			rel("alice", "diego", RelationshipKind::AlignedWith, 0.5),
			rel("tom", "sam", RelationshipKind::Supports, 0.4),
			rel("tom", "mei", RelationshipKind::DefersTo, 0.7),
		],
	}
}

/// Default Home Page: the network canvas plus a minimal selection readout
/// standing in for the external profile detail panel.
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = Signal::derive(sample_team);
	let (selected, set_selected) = signal(None::<String>);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<NetworkGraphCanvas
					data=graph_data
					fullscreen=true
					on_select=Callback::new(move |id: Option<String>| set_selected.set(id))
				/>
				<div class="graph-overlay">
					<h1>"Team Relationship Network"</h1>
					<p class="subtitle">
						"Drag members to rearrange. Click a member to focus their relationships."
					</p>
					<p class="selection">
						{move || match selected.get() {
							Some(id) => format!("Selected: {id}"),
							None => "Nothing selected".to_string(),
						}}
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
