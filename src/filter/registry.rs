use std::collections::HashMap;

use crate::compute::backend::ComputeSettings;
use crate::filter::input::InputRef;
use crate::filter::operation::Operation;
use crate::filter::stack::FilterStack;
use crate::surface::buffer::ImageBuffer;

/// Named filter stacks, with at most one selected as current.
#[derive(Debug, Default)]
pub struct FilterRegistry {
    filters: HashMap<String, FilterStack>,
    current: Option<String>,
    settings: ComputeSettings,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `settings` for every subsequent `execute`.
    pub fn with_settings(mut self, settings: ComputeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ComputeSettings {
        &self.settings
    }

    /// Open a new empty stack under `name`, replacing any previous one, and make it current.
    pub fn define_filter(&mut self, name: impl Into<String>) -> FilterBuilder<'_> {
        let name = name.into();
        if self.filters.contains_key(&name) {
            tracing::debug!(filter = %name, "redefining filter");
        }
        self.current = Some(name.clone());
        let stack = self
            .filters
            .entry(name)
            .insert_entry(FilterStack::new())
            .into_mut();
        FilterBuilder { stack }
    }

    /// Select an existing stack. Unknown names clear the selection and return `false`.
    pub fn set_filter(&mut self, name: &str) -> bool {
        if self.filters.contains_key(name) {
            self.current = Some(name.to_owned());
            true
        } else {
            tracing::debug!(filter = name, "unknown filter; selection cleared");
            self.current = None;
            false
        }
    }

    /// Append to the current stack; a no-op when none is selected.
    pub fn add_operation(&mut self, op: Operation) {
        match self.current_stack_mut() {
            Some(stack) => {
                stack.push(op);
            }
            None => tracing::debug!(primitive = op.name(), "no current filter; operation dropped"),
        }
    }

    /// Run the current filter. `None` when no filter is selected.
    pub fn execute(&self, background: &ImageBuffer, source: &ImageBuffer) -> Option<ImageBuffer> {
        let stack = self.current.as_deref().and_then(|n| self.filters.get(n))?;
        Some(stack.execute(&self.settings, background, source))
    }

    pub fn get(&self, name: &str) -> Option<&FilterStack> {
        self.filters.get(name)
    }

    /// Filter names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Remove a filter, clearing the selection if it was current.
    pub fn remove(&mut self, name: &str) -> Option<FilterStack> {
        let removed = self.filters.remove(name)?;
        if self.current.as_deref() == Some(name) {
            self.current = None;
        }
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Store a fully built stack under `name`, replacing any previous one. Selection is unchanged.
    pub(crate) fn insert_stack(&mut self, name: String, stack: FilterStack) {
        if self.filters.contains_key(&name) {
            tracing::debug!(filter = %name, "replacing filter");
        }
        self.filters.insert(name, stack);
    }

    pub(crate) fn current_stack_mut(&mut self) -> Option<&mut FilterStack> {
        let name = self.current.as_deref()?;
        self.filters.get_mut(name)
    }
}

/// Definition session for one named filter; holds the registry borrowed mutably.
#[derive(Debug)]
pub struct FilterBuilder<'a> {
    stack: &'a mut FilterStack,
}

impl<'a> FilterBuilder<'a> {
    pub(crate) fn new(stack: &'a mut FilterStack) -> Self {
        Self { stack }
    }

    /// Append a primitive and return its node index.
    pub fn add(&mut self, op: Operation) -> usize {
        self.stack.push(op)
    }

    /// Append a primitive and name its output.
    pub fn add_with_result(&mut self, result: impl Into<String>, op: Operation) -> usize {
        let index = self.stack.push(op);
        self.stack.name_result(result, index);
        index
    }

    /// Input used when a primitive omits `in`: the previous node, or the source for the first.
    pub fn default_input(&self) -> InputRef {
        match self.stack.len() {
            0 => InputRef::Source,
            n => InputRef::Node(n - 1),
        }
    }

    /// Resolve a keyword or an earlier `result` name.
    pub fn resolve_input(&self, name: &str) -> Option<InputRef> {
        InputRef::from_keyword(name).or_else(|| self.stack.result_index(name).map(InputRef::Node))
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/registry.rs"]
mod tests;
