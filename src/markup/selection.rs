//! Ordered, empty-tolerant result sets over a [`Document`].
//!
//! Nothing in here fails: a query that matches nothing yields an empty
//! selection, and reading text from an empty selection yields `""`.

use crate::markup::document::{Document, ElementData, NodeId};
use crate::markup::selector::{Combinator, Compound, Position, Selector};

#[derive(Debug, Clone)]
pub struct Selection<'a> {
    document: &'a Document,
    nodes: Vec<NodeId>,
}

impl<'a> Selection<'a> {
    pub(crate) fn new(document: &'a Document, nodes: Vec<NodeId>) -> Self {
        Self { document, nodes }
    }

    pub fn empty(document: &'a Document) -> Self {
        Self::new(document, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn first(&self) -> Self {
        self.at(Position::First)
    }

    pub fn last(&self) -> Self {
        self.at(Position::Last)
    }

    pub fn nth(&self, index: usize) -> Self {
        self.at(Position::Nth(index))
    }

    pub fn at(&self, position: Position) -> Self {
        let picked = match position {
            Position::First => self.nodes.first(),
            Position::Last => self.nodes.last(),
            Position::Nth(index) => self.nodes.get(index),
        };
        Self::new(self.document, picked.copied().into_iter().collect())
    }

    /// Apply `selector` below every node of this selection. Steps narrow the
    /// match set one combinator at a time; the position pseudo-class, if any,
    /// picks from the final merged set.
    pub fn find(&self, selector: &Selector) -> Self {
        let mut current = self.nodes.clone();
        for step in selector.steps() {
            current = match step.combinator {
                Combinator::Child => self.child_matches(&current, &step.compound),
                Combinator::Descendant => self.descendant_matches(&current, &step.compound),
            };
        }

        let matched = Self::new(self.document, current);
        match selector.position() {
            Some(position) => matched.at(position),
            None => matched,
        }
    }

    /// Element children of every node, optionally restricted to one tag name.
    pub fn children(&self, tag: Option<&str>) -> Self {
        let nodes = self
            .nodes
            .iter()
            .flat_map(|&id| self.document.children_of(id).iter().copied())
            .filter(|&child| {
                self.document
                    .element(child)
                    .is_some_and(|el| tag.map_or(true, |tag| el.name == tag))
            })
            .collect();
        Self::new(self.document, nodes)
    }

    /// Trimmed concatenation of the text of every node in the selection.
    pub fn text(&self) -> String {
        let joined: String = self
            .nodes
            .iter()
            .map(|&id| self.document.raw_text(id))
            .collect();
        joined.trim().to_string()
    }

    /// Trimmed text of each node, in document order.
    pub fn texts(&self) -> Vec<String> {
        self.iter().map(|element| element.text()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementRef<'a>> + '_ {
        let document = self.document;
        self.nodes.iter().map(move |&id| ElementRef { document, id })
    }

    fn matches(&self, id: NodeId, compound: &Compound) -> bool {
        self.document
            .element(id)
            .is_some_and(|element| compound.matches(element))
    }

    fn child_matches(&self, scope: &[NodeId], compound: &Compound) -> Vec<NodeId> {
        let mut found: Vec<NodeId> = scope
            .iter()
            .flat_map(|&id| self.document.children_of(id).iter().copied())
            .filter(|&child| self.matches(child, compound))
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    fn descendant_matches(&self, scope: &[NodeId], compound: &Compound) -> Vec<NodeId> {
        let mut roots = scope.to_vec();
        roots.sort_unstable();

        // Subtrees are contiguous, so a root inside an already scanned range
        // contributes nothing new.
        let mut found = Vec::new();
        let mut covered_until = 0;
        for root in roots {
            let range = self.document.descendants_of(root);
            if root < covered_until {
                continue;
            }
            covered_until = range.end;
            found.extend(range.filter(|&id| self.matches(id, compound)));
        }
        found
    }
}

/// Handle on a single node of a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    document: &'a Document,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn element(&self) -> Option<&'a ElementData> {
        self.document.element(self.id)
    }

    pub fn name(&self) -> Option<&'a str> {
        self.element().map(|el| el.name.as_str())
    }

    pub fn text(&self) -> String {
        self.document.raw_text(self.id).trim().to_string()
    }

    pub fn children(&self, tag: Option<&str>) -> Selection<'a> {
        self.to_selection().children(tag)
    }

    pub fn find(&self, selector: &Selector) -> Selection<'a> {
        self.to_selection().find(selector)
    }

    pub fn to_selection(&self) -> Selection<'a> {
        Selection::new(self.document, vec![self.id])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = concat!(
        r#"<table id="intro"><tbody><tr><td>a</td></tr><tr><td>b</td><td>c</td></tr></tbody></table>"#,
        r#"<table class="product-details"><tr><td class="segment"> TGV </td><td class="segment"> 6121 </td></tr></table>"#,
        r#"<table class="product-details"><tr><td class="segment"> TER </td></tr></table>"#,
    );

    fn selector(source: &str) -> Selector {
        Selector::parse(source).unwrap()
    }

    #[test]
    fn test_query_in_document_order() {
        let document = Document::parse(FIXTURE);
        let cells = document.query(&selector("td.segment"));

        assert_eq!(cells.len(), 3);
        assert_eq!(cells.texts(), vec!["TGV", "6121", "TER"]);
    }

    #[test]
    fn test_child_chain() {
        let document = Document::parse(FIXTURE);
        let rows = document.query(&selector("#intro > tbody > tr"));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows.last().children(Some("td")).last().text(), "c");
    }

    #[test]
    fn test_child_combinator_skips_grandchildren() {
        let document = Document::parse(FIXTURE);
        let tables = document.query(&selector("table.product-details"));

        assert!(tables.find(&selector("> td")).is_empty());
        assert_eq!(tables.find(&selector("> tr > td")).len(), 3);
    }

    #[test]
    fn test_positions_apply_to_the_whole_match_set() {
        let document = Document::parse(FIXTURE);
        let tables = document.query(&selector("table.product-details"));

        // Both tables hold segment cells; :first picks one cell overall,
        // not one per table.
        assert_eq!(tables.find(&selector("td.segment:first")).text(), "TGV");
        assert_eq!(tables.find(&selector("td.segment:last")).text(), "TER");
        assert_eq!(document.query(&selector("td.segment:eq(1)")).text(), "6121");
    }

    #[test]
    fn test_nested_scopes_are_deduplicated() {
        let document = Document::parse(FIXTURE);
        let every_element = document.query(&selector("*"));
        let cells = every_element.find(&selector("td"));

        assert_eq!(cells.len(), 6);
    }

    #[test]
    fn test_empty_results_never_fail() {
        let document = Document::parse(FIXTURE);
        let missing = document.query(&selector("td.pnr-ref"));

        assert!(missing.is_empty());
        assert_eq!(missing.text(), "");
        assert_eq!(missing.last().children(None).text(), "");
        assert!(document.query(&selector("td")).nth(42).is_empty());
        assert!(Selection::empty(&document).first().is_empty());
    }

    #[test]
    fn test_selection_text_concatenates_then_trims() {
        let document = Document::parse(FIXTURE);
        let cells = document.query(&selector("table.product-details td"));

        assert_eq!(cells.text(), "TGV  6121  TER");
    }

    #[test]
    fn test_element_ref_accessors() {
        let document = Document::parse(FIXTURE);
        let table = document.query(&selector("#intro")).iter().next().unwrap();

        assert_eq!(table.name(), Some("table"));
        assert_eq!(table.children(Some("tbody")).len(), 1);
        assert_eq!(table.find(&selector("td")).len(), 3);
    }
}
