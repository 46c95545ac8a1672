//! Event-driven construction of an [`ElementTree`]
//!
//! The builder consumes open/text/close events in document order and keeps
//! an explicit stack of open elements. Closing an element folds it into its
//! parent according to the parent's [`ElementKind`].

use super::element::{Element, ElementId, ElementKind, ElementTree};
use super::PhenixError;

/// Builds an element tree from a depth-first stream of parse events
#[derive(Debug, Default)]
pub struct ElementTreeBuilder {
    elements: Vec<Element>,
    stack: Vec<ElementId>,
}

impl ElementTreeBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Handle an open tag
    ///
    /// The first element of the document becomes the root; later elements
    /// get the variant matching their tag and the current top of stack as
    /// parent.
    pub fn start_element<I>(&mut self, tag: &str, attributes: I) -> Result<ElementId, PhenixError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let parent = self.stack.last().copied();
        let kind = match parent {
            Some(_) => ElementKind::for_tag(tag),
            None if self.elements.is_empty() => ElementKind::root(),
            None => return Err(PhenixError::MultipleRoots(tag.to_string())),
        };

        let id = ElementId(self.elements.len());
        self.elements.push(Element::new(tag, kind, parent, attributes));
        self.stack.push(id);
        Ok(id)
    }

    /// Handle a run of character data
    ///
    /// Text outside the root element is ignored.
    pub fn characters(&mut self, text: &str) {
        if let Some(&current) = self.stack.last() {
            self.elements[current.0].push_text(text);
        }
    }

    /// Handle a close tag
    pub fn end_element(&mut self, tag: &str) -> Result<(), PhenixError> {
        let current = self
            .stack
            .pop()
            .ok_or_else(|| PhenixError::UnexpectedClose(tag.to_string()))?;

        let element = &self.elements[current.0];
        if element.tag() != tag {
            return Err(PhenixError::UnbalancedElement {
                expected: element.tag().to_string(),
                found: tag.to_string(),
            });
        }

        if let Some(parent) = element.parent() {
            // Parents are always allocated before their children
            let (head, tail) = self.elements.split_at_mut(current.0);
            head[parent.0].fold(current, &tail[0])?;
        }
        Ok(())
    }

    /// Finish the document and hand over the tree
    pub fn finish(self) -> Result<ElementTree, PhenixError> {
        if let Some(&open) = self.stack.last() {
            return Err(PhenixError::UnclosedElement(
                self.elements[open.0].tag().to_string(),
            ));
        }
        if self.elements.is_empty() {
            return Err(PhenixError::EmptyDocument);
        }
        Ok(ElementTree::from_elements(self.elements))
    }
}
