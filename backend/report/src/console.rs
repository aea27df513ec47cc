//! Plain-text console report.

use a11yscore_core::{order_for_display, AggregateScore, CaseResult};

/// Renders every result, failures first, followed by the score line.
pub fn render_results(results: &[CaseResult], score: Option<AggregateScore>) -> String {
    let mut ordered = results.to_vec();
    order_for_display(&mut ordered);

    let mut out = String::new();
    for result in &ordered {
        out.push_str(&format!("{result}\n"));
    }
    if let Some(score) = score {
        out.push_str(&format!("Score: {score}\n"));
    }
    out
}

pub fn no_match_message(name: Option<&str>) -> String {
    format!("No tests matched the name {}", name.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use a11yscore_core::Verdict;

    fn result(name: &str, verdict: Verdict, detail: Option<&str>) -> CaseResult {
        CaseResult {
            name: name.into(),
            verdict,
            detail: detail.map(str::to_string),
        }
    }

    #[test]
    fn renders_failures_first_then_score() {
        let results = vec![
            result("nav", Verdict::Pass, None),
            result("meter", Verdict::Half, Some("Element did not have the correct value")),
            result("article", Verdict::Fail, Some("Unable to find the browser")),
        ];
        let score = AggregateScore::from_verdicts(results.iter().map(|r| r.verdict));
        let out = render_results(&results, score);
        assert_eq!(
            out,
            "article:\n\tFail (Unable to find the browser)\n\
             meter:\n\tHalf (Element did not have the corre)\n\
             nav:\n\tPass\n\
             Score: 50\n"
        );
    }

    #[test]
    fn empty_batch_message() {
        assert_eq!(no_match_message(Some("meterx")), "No tests matched the name meterx");
        assert!(render_results(&[], None).is_empty());
    }
}
