use crate::pipeline::ProcessingResult;

const CSV_HEADER: &str = "title,url,duration,transcript,filename,processed_at";

/// One row per result, success and failure alike; failure rows carry empty
/// cells for the fields they lack.
pub fn format_as_csv(results: &[ProcessingResult]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for result in results {
        let row = [
            csv_escape(result.title.as_deref().unwrap_or("")),
            csv_escape(&result.url),
            result
                .duration_seconds
                .map(|d| d.to_string())
                .unwrap_or_default(),
            csv_escape(result.transcript.as_deref().unwrap_or("")),
            csv_escape(result.output_filename.as_deref().unwrap_or("")),
            result.processed_at.to_rfc3339(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// An ordered array of records with the tabular fields plus status and error
/// detail.
pub fn format_as_json(results: &[ProcessingResult]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(results)
}

/// Quote a field if it contains a delimiter, quote, or line break.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(csv_escape("episode_1.txt"), "episode_1.txt");
    }

    #[test]
    fn delimiters_and_quotes_are_escaped() {
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("she said \"hi\""), "\"she said \"\"hi\"\"\"");
        assert_eq!(csv_escape("line\nbreak"), "\"line\nbreak\"");
    }
}
