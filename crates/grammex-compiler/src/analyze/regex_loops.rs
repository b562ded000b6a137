//! Reference loops between labelled regular expressions.

use grammex_core::{Grammar, NodeId, RegexKind};
use indexmap::IndexSet;

use super::cycles::{Graph, find_cycle, is_cyclic, strongly_connected};
use super::walker::children;
use crate::diagnostics::{DiagnosticKind, Diagnostics};

pub fn check_regex_loops(grammar: &Grammar, diag: &mut Diagnostics) {
    let mut graph: Graph<NodeId> = Graph::new();
    for (_, tp) in grammar.token_productions() {
        for spec in &tp.specs {
            let mut refs = IndexSet::new();
            collect_refs(grammar, spec.regex, &mut refs);
            graph.entry(spec.regex).or_default().extend(refs);
        }
    }

    let mut sccs = strongly_connected(&graph);
    sccs.sort_by_key(|scc| scc.iter().min().copied());

    for scc in sccs {
        if !is_cyclic(&graph, &scc) {
            continue;
        }
        let Some(&start) = scc.iter().min() else {
            continue;
        };
        let Some(chain) = find_cycle(&graph, &scc, start) else {
            continue;
        };

        let names: Vec<_> = chain
            .iter()
            .map(|&id| format!("...{}...", grammar.label(id).unwrap_or_default()))
            .collect();
        diag.report(DiagnosticKind::RegexLoop, grammar.location(start))
            .message(format!("\"{}\"", names.join(" --> ")))
            .emit();
    }
}

/// Labelled expressions referenced from `node`, without following the references.
fn collect_refs(grammar: &Grammar, node: NodeId, out: &mut IndexSet<NodeId>) {
    if let Some(regex) = grammar.regex(node)
        && let RegexKind::JustName(target) = regex.kind
    {
        out.insert(target);
        return;
    }
    for child in children(grammar, node) {
        collect_refs(grammar, child, out);
    }
}
