//! Canonical column vocabulary shared by both source datasets.
//!
//! Both datasets are reduced to the same seven categorical grouping-key
//! columns plus one numeric value column each. The dropout dataset uses a
//! different vocabulary for four of the key fields; [`DROPOUT_RENAMES`]
//! maps those onto the canonical names.

/// The seven fields that make up the grouping key, in canonical order.
///
/// One aggregation bucket is identified by the full tuple. A null in any
/// field is a valid, distinct key component: it groups with (and joins
/// against) only an identical null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupColumn {
    AcademicYear,
    UniversityType,
    UniversityCode,
    StudyType,
    Branch,
    Sex,
    Integrated,
}

impl GroupColumn {
    /// All key fields in canonical order.
    pub const ALL: [GroupColumn; 7] = [
        GroupColumn::AcademicYear,
        GroupColumn::UniversityType,
        GroupColumn::UniversityCode,
        GroupColumn::StudyType,
        GroupColumn::Branch,
        GroupColumn::Sex,
        GroupColumn::Integrated,
    ];

    /// Canonical column name in the harmonized tables.
    pub const fn as_str(&self) -> &'static str {
        match self {
            GroupColumn::AcademicYear => "academic_year",
            GroupColumn::UniversityType => "university_type",
            GroupColumn::UniversityCode => "university_code",
            GroupColumn::StudyType => "study_type",
            GroupColumn::Branch => "branch",
            GroupColumn::Sex => "sex",
            GroupColumn::Integrated => "integrated",
        }
    }
}

/// Canonical grouping-key column names, same order as [`GroupColumn::ALL`].
pub const GROUP_COLS: [&str; 7] = [
    "academic_year",
    "university_type",
    "university_code",
    "study_type",
    "branch",
    "sex",
    "integrated",
];

/// Value column of the performance dataset.
pub const PERFORMANCE_RATE: &str = "performance_rate";

/// Value column of the dropout dataset.
pub const DROPOUT_RATE: &str = "first_year_dropout_rate";

/// Column renames applied to the dropout dataset so both tables share the
/// canonical key vocabulary. Pairs are (dropout name, canonical name).
pub const DROPOUT_RENAMES: [(&str, &str); 4] = [
    ("responsible_university_type", "university_type"),
    ("responsible_university", "university"),
    ("student_sex", "sex"),
    ("center_type", "integrated"),
];

/// Columns removed from both datasets before aggregation.
pub const SHARED_DROP_COLS: [&str; 2] = ["university", "unit"];

/// Columns removed from the performance dataset only.
pub const PERFORMANCE_ONLY_DROP_COLS: [&str; 2] = ["credits_passed", "credits_enrolled"];
