/// Split the stored participants column into emails, dropping empty entries.
pub fn parse_participants(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) => s
            .split(',')
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string())
            .collect(),
        None => Vec::new(),
    }
}

/// Join emails back into the stored column form. Commas inside an email are
/// not escaped and will split into separate entries on the next read.
pub fn join_participants(participants: &[String]) -> String {
    participants.join(",")
}
