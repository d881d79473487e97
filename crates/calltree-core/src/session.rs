//! Form sessions
//!
//! A [`FormSession`] holds one contract ABI and, once a method is selected,
//! the parameter tree the user is filling in. Every edit re-annotates the
//! tree and yields a [`Snapshot`] for display.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::abi::{Abi, FunctionInfo, ParsedFunctions};
use crate::encode::encode_call;
use crate::error::{Error, Result};
use crate::tree::{CompletionStats, Outcome, ParameterTree, TreeBuilder};

/// Consistent view of a session after an edit
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub function: FunctionInfo,
    pub tree: ParameterTree,
    pub values: Vec<Value>,
    pub stats: CompletionStats,
    pub complete: bool,
    /// Last rejected text edit, cleared by the next successful edit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

/// Everything the call-encoding collaborator needs for one method call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallPayload {
    pub signature: String,
    pub selector: String,
    pub types: Vec<String>,
    pub values: Vec<Value>,
    /// Whether the call may carry native value
    pub payable: bool,
    /// ABI-encoded call data as 0x-prefixed hex
    pub call_data: String,
}

#[derive(Debug, Clone)]
struct Selection {
    function: FunctionInfo,
    tree: ParameterTree,
    stats: CompletionStats,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FormSession {
    abi: Abi,
    builder: TreeBuilder,
    selection: Option<Selection>,
}

impl FormSession {
    pub fn new(abi: Abi) -> Self {
        Self::with_builder(abi, TreeBuilder::new())
    }

    pub fn with_builder(abi: Abi, builder: TreeBuilder) -> Self {
        Self {
            abi,
            builder,
            selection: None,
        }
    }

    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    pub fn functions(&self) -> ParsedFunctions {
        self.abi.functions()
    }

    pub fn selected(&self) -> Option<&FunctionInfo> {
        self.selection.as_ref().map(|s| &s.function)
    }

    pub fn tree(&self) -> Option<&ParameterTree> {
        self.selection.as_ref().map(|s| &s.tree)
    }

    /// Select a method, discarding any tree built for a previous selection
    pub fn select(&mut self, name_or_signature: &str) -> Result<Snapshot> {
        let function = self.abi.function_info(name_or_signature)?;
        let mut tree = self.builder.build(&function.inputs)?;
        let stats = tree.annotate();
        info!(
            method = %function.signature,
            leaves = stats.total,
            "selected method"
        );

        self.selection = Some(Selection {
            function,
            tree,
            stats,
            error: None,
        });
        self.snapshot()
    }

    pub fn set_value(&mut self, path: &[usize], input: &str) -> Result<Snapshot> {
        self.edit(|tree| tree.set_value(path, input))
    }

    pub fn toggle(&mut self, path: &[usize]) -> Result<Snapshot> {
        self.edit(|tree| tree.toggle(path))
    }

    pub fn grow(&mut self, path: &[usize]) -> Result<Snapshot> {
        self.edit(|tree| tree.grow(path))
    }

    pub fn delete(&mut self, path: &[usize]) -> Result<Snapshot> {
        self.edit(|tree| tree.delete(path))
    }

    pub fn resize(&mut self, path: &[usize], len: usize) -> Result<Snapshot> {
        self.edit(|tree| tree.resize(path, len))
    }

    /// Replace the tree's values from the text view.
    ///
    /// Text that is not JSON is rejected without touching the tree. A shape
    /// mismatch clears the tree and is reported in [`Snapshot::error`].
    pub fn apply_text(&mut self, text: &str) -> Result<Snapshot> {
        let selection = self.selection_mut()?;
        let parsed: Value = serde_json::from_str(text).map_err(|e| {
            Error::InvalidParameter(format!("text view is not valid JSON: {}", e))
        })?;

        match selection.tree.apply_json(&parsed) {
            Ok(()) => selection.error = None,
            Err(err) if err.is_shape_mismatch() => selection.error = Some(err.to_string()),
            Err(err) => return Err(err),
        }
        selection.stats = selection.tree.annotate();
        self.snapshot()
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        let selection = self.selection.as_ref().ok_or(Error::NoMethodSelected)?;
        Ok(Snapshot {
            function: selection.function.clone(),
            tree: selection.tree.clone(),
            values: selection.tree.values(),
            stats: selection.stats,
            complete: selection.tree.is_complete(),
            error: selection.error.clone(),
            outcome: None,
        })
    }

    /// Produce the call payload. The tree must be complete and free of errors.
    pub fn submit(&mut self) -> Result<CallPayload> {
        let selection = self.selection_mut()?;
        selection.stats = selection.tree.annotate();
        if !selection.tree.is_complete() || selection.tree.has_errors() {
            return Err(Error::Incomplete {
                completed: selection.stats.completed,
                total: selection.stats.total,
            });
        }

        let values = selection.tree.values();
        let types = selection.function.input_types();
        let payable = selection.function.state_mutability.is_payable();
        let signature = selection.function.signature.clone();
        let function = self.abi.function(&signature)?;
        let call_data = encode_call(function, &values)?;
        info!(method = %signature, bytes = call_data.len(), "encoded call");

        Ok(CallPayload {
            selector: format!("0x{}", hex::encode(function.selector())),
            types,
            signature,
            values,
            payable,
            call_data: format!("0x{}", hex::encode(&call_data)),
        })
    }

    fn selection_mut(&mut self) -> Result<&mut Selection> {
        self.selection.as_mut().ok_or(Error::NoMethodSelected)
    }

    fn edit(
        &mut self,
        op: impl FnOnce(&mut ParameterTree) -> Result<Outcome>,
    ) -> Result<Snapshot> {
        let selection = self.selection_mut()?;
        let outcome = op(&mut selection.tree)?;
        if outcome == Outcome::Applied {
            selection.error = None;
        }
        selection.stats = selection.tree.annotate();
        debug!(
            ?outcome,
            completed = selection.stats.completed,
            total = selection.stats.total,
            "edit"
        );

        let mut snapshot = self.snapshot()?;
        snapshot.outcome = Some(outcome);
        Ok(snapshot)
    }
}
