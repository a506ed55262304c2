use std::collections::BTreeMap;

use crate::DecodeIssue;
use crate::protocols::hrm::HrmError;

const MAX_EXAMPLES: usize = 3;

#[derive(Debug, Clone)]
struct IssueEntry {
    field: &'static str,
    message: String,
    count: u64,
    examples: Vec<String>,
}

/// Malformed notifications keyed by issue ID; the map keeps output sorted.
#[derive(Debug, Default, Clone)]
pub(crate) struct IssueStats {
    entries: BTreeMap<String, IssueEntry>,
}

impl IssueStats {
    pub(crate) fn add(&mut self, err: &HrmError, context: String) {
        let field = err.field().as_str();
        let entry = self
            .entries
            .entry(issue_id(err))
            .or_insert_with(|| IssueEntry {
                field,
                message: issue_message(err),
                count: 0,
                examples: Vec::new(),
            });
        entry.count += 1;
        if entry.examples.len() < MAX_EXAMPLES {
            entry.examples.push(context);
        }
    }

    pub(crate) fn build_issues(self) -> Vec<DecodeIssue> {
        self.entries
            .into_iter()
            .map(|(id, entry)| DecodeIssue {
                id,
                field: entry.field.to_string(),
                message: entry.message,
                count: entry.count,
                examples: entry.examples,
            })
            .collect()
    }
}

fn issue_id(err: &HrmError) -> String {
    let field = err.field().as_str().to_ascii_uppercase().replace('_', "-");
    format!("HRM-SHORT-{field}")
}

fn issue_message(err: &HrmError) -> String {
    format!("{} field extends past end of payload", err.field())
}
