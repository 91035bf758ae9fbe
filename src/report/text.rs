use crate::model::scores::MarkerTable;
use crate::report::{SummaryData, format_f64_6};

const TOP_ROWS: usize = 20;

pub fn render_report_text(summary: &SummaryData, table: &MarkerTable) -> String {
    let mut out = String::new();

    out.push_str("Ambient Marker Candidate Report\n");
    out.push_str("===============================\n\n");

    out.push_str("1. Input\n");
    out.push_str(&format!(
        "Features (raw): {}\nGenes: {}\nCells: {}\nNonzero entries: {}\nSize factors: {}\n\n",
        summary.input.n_features_raw,
        summary.input.n_genes,
        summary.input.n_cells,
        summary.input.nnz,
        summary.input.size_factors
    ));

    out.push_str("2. Candidate gates\n");
    out.push_str(&format!(
        "Shortlisted by ambient abundance (cap {}): {}\n",
        summary.params.max_candidates, summary.gates.shortlisted
    ));
    out.push_str(&format!(
        "Dropped by {} oracle (no non-expressing cells): {}\n",
        summary.gates.oracle, summary.gates.oracle_dropped
    ));
    out.push_str(&format!(
        "Reported: {}\nUseful: {}\n\n",
        summary.gates.reported, summary.gates.useful
    ));

    out.push_str("3. Top candidates\n");
    if table.is_empty() {
        out.push_str("No candidate genes survived both gates.\n");
    } else {
        out.push_str("gene\tnCells\tlowFrac\textremity\tisUseful\n");
        for row in table.rows.iter().take(TOP_ROWS) {
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                row.gene,
                row.n_cells,
                format_f64_6(row.low_frac),
                format_f64_6(row.extremity),
                if row.is_useful { "yes" } else { "no" }
            ));
        }
    }
    out.push('\n');

    out.push_str("4. Caveats\n");
    out.push_str(
        "Statistics cover only cells with a nonzero count for the gene. \
         Candidates need manual review before use in contamination estimation.\n",
    );

    out
}
