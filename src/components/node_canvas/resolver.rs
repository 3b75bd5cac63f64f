//! Per-graph-kind edge resolution.
//!
//! A resolver answers one question: given a node id, which node ids
//! should it visually connect to? Each graph kind has its own policy
//! object built from that kind's link data. Resolvers never check that
//! a target actually exists on the canvas; source data is allowed to be
//! transiently inconsistent while the user edits, and the canvas drops
//! unknown targets at rebuild time.

use std::collections::HashMap;

/// Policy that computes the outgoing edges of a node.
pub trait EdgeResolver {
	/// Ids this node should draw a directed connector to.
	///
	/// May name ids not currently on the canvas; empty-string "no
	/// target" sentinels are already filtered out here.
	fn resolve_targets(&self, id: &str) -> Vec<String>;
}

fn non_empty(target: &str) -> Option<String> {
	if target.is_empty() {
		None
	} else {
		Some(target.to_string())
	}
}

/// Dialogue trees: one edge to the linear "next" block, plus one per
/// dialogue option that names a target.
#[derive(Debug, Default)]
pub struct DialogueResolver {
	links: HashMap<String, (Option<String>, Vec<String>)>,
}

impl DialogueResolver {
	pub fn new<I>(nodes: I) -> Self
	where
		I: IntoIterator<Item = (String, Option<String>, Vec<String>)>,
	{
		Self {
			links: nodes
				.into_iter()
				.map(|(id, next, options)| (id, (next, options)))
				.collect(),
		}
	}
}

impl EdgeResolver for DialogueResolver {
	fn resolve_targets(&self, id: &str) -> Vec<String> {
		let Some((next, options)) = self.links.get(id) else {
			return Vec::new();
		};
		let mut targets: Vec<String> = next
			.as_deref()
			.and_then(non_empty)
			.into_iter()
			.collect();
		targets.extend(options.iter().filter_map(|t| non_empty(t)));
		targets
	}
}

/// Localized text blocks: a single edge to the declared parent block.
#[derive(Debug, Default)]
pub struct TextBlockResolver {
	parents: HashMap<String, Option<String>>,
}

impl TextBlockResolver {
	pub fn new<I>(nodes: I) -> Self
	where
		I: IntoIterator<Item = (String, Option<String>)>,
	{
		Self {
			parents: nodes.into_iter().collect(),
		}
	}
}

impl EdgeResolver for TextBlockResolver {
	fn resolve_targets(&self, id: &str) -> Vec<String> {
		self.parents
			.get(id)
			.and_then(|p| p.as_deref())
			.and_then(non_empty)
			.into_iter()
			.collect()
	}
}

/// Ship-log entries: one edge per rumor-fact source reference.
#[derive(Debug, Default)]
pub struct ShipLogResolver {
	sources: HashMap<String, Vec<String>>,
}

impl ShipLogResolver {
	pub fn new<I>(nodes: I) -> Self
	where
		I: IntoIterator<Item = (String, Vec<String>)>,
	{
		Self {
			sources: nodes.into_iter().collect(),
		}
	}
}

impl EdgeResolver for ShipLogResolver {
	fn resolve_targets(&self, id: &str) -> Vec<String> {
		self.sources
			.get(id)
			.map(|s| s.iter().filter_map(|t| non_empty(t)).collect())
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn dialogue_skips_empty_targets() {
		let resolver = DialogueResolver::new([(
			"a".to_string(),
			Some("b".to_string()),
			vec!["".to_string(), "c".to_string()],
		)]);
		assert_eq!(
			resolver.resolve_targets("a"),
			vec!["b".to_string(), "c".to_string()]
		);
	}

	#[test]
	fn dialogue_unknown_node_resolves_to_nothing() {
		let resolver = DialogueResolver::default();
		assert!(resolver.resolve_targets("ghost").is_empty());
	}

	#[test]
	fn text_block_single_parent_edge() {
		let resolver = TextBlockResolver::new([
			("root".to_string(), None),
			("child".to_string(), Some("root".to_string())),
			("orphan".to_string(), Some("".to_string())),
		]);
		assert_eq!(resolver.resolve_targets("child"), vec!["root".to_string()]);
		assert!(resolver.resolve_targets("root").is_empty());
		assert!(
			resolver.resolve_targets("orphan").is_empty(),
			"empty parent means no edge"
		);
	}

	#[test]
	fn ship_log_one_edge_per_source() {
		let resolver = ShipLogResolver::new([(
			"entry".to_string(),
			vec!["a".to_string(), "b".to_string()],
		)]);
		assert_eq!(
			resolver.resolve_targets("entry"),
			vec!["a".to_string(), "b".to_string()]
		);
	}

	#[test]
	fn targets_may_reference_unknown_nodes() {
		// The resolver is deliberately lenient; filtering happens at
		// rebuild time against the live model.
		let resolver = ShipLogResolver::new([(
			"entry".to_string(),
			vec!["not-created-yet".to_string()],
		)]);
		assert_eq!(
			resolver.resolve_targets("entry"),
			vec!["not-created-yet".to_string()]
		);
	}
}
