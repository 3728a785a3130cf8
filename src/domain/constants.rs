pub const DEFAULT_PASSES: u32 = 3;
pub const DEFAULT_CATALOG_FILE: &str = "hazard_definitions.json";

pub const AFFIRMATIVE: &[&str] = &["yes", "y", "1"];
pub const NEGATIVE: &[&str] = &["no", "n", "2", ""];
pub const DEFINE: &[&str] = &["define", "def", "d", "3"];
pub const REASON: &[&str] = &["reason", "r", "4"];

pub const ANSWER_HELP: &str = "After each question answer with (y/n/d/r)
 - Yes (y / 1) adds the hazard to the identified hazards
 - No (n / 2) rejects the hazard
 - Define (d / 3) shows the hazard description, then asks (y/n)
 - Reason (r / 4) shows what suggested the hazard, then asks (y/n)";
