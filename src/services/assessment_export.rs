use crate::db::models::Assessment;

const HEADER: &[&str] =
    &["Title", "Course", "Type", "Duration", "Passing Score", "Questions", "Status"];

/// Render the filtered assessment list as CSV: one header row plus exactly one
/// row per assessment, every field individually double-quoted.
pub(crate) fn to_csv(rows: &[(Assessment, String)]) -> String {
    let mut output = String::new();
    push_row(&mut output, HEADER.iter().map(|field| field.to_string()));

    for (assessment, course_title) in rows {
        let status = if assessment.is_active { "Active" } else { "Inactive" };
        push_row(
            &mut output,
            [
                assessment.title.clone(),
                course_title.clone(),
                assessment.kind.as_str().to_string(),
                format!("{} mins", assessment.duration_minutes),
                format!("{}%", assessment.passing_score),
                assessment.questions.0.len().to_string(),
                status.to_string(),
            ]
            .into_iter(),
        );
    }

    output
}

fn push_row(output: &mut String, fields: impl Iterator<Item = String>) {
    let quoted: Vec<String> =
        fields.map(|field| format!("\"{}\"", field.replace('"', "\"\""))).collect();
    output.push_str(&quoted.join(","));
    output.push('\n');
}
