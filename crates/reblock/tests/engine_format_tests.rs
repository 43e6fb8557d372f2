//! Tests for the output format cost model.
//!
//! ## Test Organization
//!
//! 1. **Costs** - Byte estimates per representation
//! 2. **Decision** - Cheaper representation wins, ties go to blocks

use reblock::prelude::*;

// ============================================================================
// Cost Tests
// ============================================================================

/// Test byte estimates.
///
/// Verifies 16 bytes per block key plus 16 per blocked cell, and 24 bytes per
/// cell record.
#[test]
fn test_format_costs() {
    let costs = FormatCosts::new(100, 10);

    assert_eq!(costs.blocked, 16 * 10 + 16 * 100);
    assert_eq!(costs.cell, 24 * 100);
}

// ============================================================================
// Decision Tests
// ============================================================================

/// Test the decision boundary.
///
/// Blocked wins while `blocks <= cells / 2`.
#[test]
fn test_format_decision_boundary() {
    assert_eq!(OutputFormat::decide(2, 1), OutputFormat::Blocked, "Tie");
    assert_eq!(OutputFormat::decide(3, 2), OutputFormat::Cell);
    assert_eq!(OutputFormat::decide(100, 50), OutputFormat::Blocked);
    assert_eq!(OutputFormat::decide(100, 51), OutputFormat::Cell);
    assert_eq!(OutputFormat::decide(1, 1), OutputFormat::Cell);
}

/// Test format display names.
#[test]
fn test_format_display() {
    assert_eq!(OutputFormat::Blocked.to_string(), "blocked");
    assert_eq!(OutputFormat::Cell.to_string(), "cell");
}

/// Test a report counts emissions by format.
#[test]
fn test_report_emissions() {
    let report = FlushReport {
        cells: 10,
        blocks: 3,
        format: OutputFormat::Blocked,
        costs: FormatCosts::new(10, 3),
        sparse_blocks: false,
    };

    assert_eq!(report.emissions(), 3);
    assert_eq!(
        FlushReport {
            format: OutputFormat::Cell,
            ..report
        }
        .emissions(),
        10
    );
}
