//! Point grids for every scored factor.
//!
//! Coded tables are matched exactly on their value. Banded tables are ordered
//! from the highest threshold down and award the first entry whose threshold
//! the input reaches. Anything unmatched scores 0.

use serde::Serialize;

/// One row of a point grid
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RuleEntry<V: 'static> {
    pub value: V,
    pub label: &'static str,
    pub points: u32,
}

/// Ordered, immutable point grid for a single factor
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RuleTable<V: 'static> {
    pub name: &'static str,
    pub entries: &'static [RuleEntry<V>],
}

impl<V: 'static> RuleTable<V> {
    /// Highest number of points any entry awards
    pub fn max_points(&self) -> u32 {
        self.entries.iter().map(|e| e.points).max().unwrap_or(0)
    }

    /// Best-scoring entry (first one on ties)
    pub fn top(&self) -> Option<&'static RuleEntry<V>> {
        let max = self.max_points();
        self.entries.iter().find(|e| e.points == max)
    }
}

impl RuleTable<&'static str> {
    /// Exact match on a code
    pub fn lookup(&self, value: Option<&str>) -> u32 {
        self.entry(value).map(|e| e.points).unwrap_or(0)
    }

    pub fn entry(&self, value: Option<&str>) -> Option<&'static RuleEntry<&'static str>> {
        let value = value?;
        self.entries.iter().find(|e| e.value == value)
    }
}

impl<V: PartialOrd + Copy + 'static> RuleTable<V> {
    /// First entry whose threshold is reached by `value`
    pub fn lookup_band(&self, value: V) -> u32 {
        self.entries
            .iter()
            .find(|e| value >= e.value)
            .map(|e| e.points)
            .unwrap_or(0)
    }
}

const fn entry<V>(value: V, label: &'static str, points: u32) -> RuleEntry<V> {
    RuleEntry {
        value,
        label,
        points,
    }
}

pub mod codes {
    pub const NORTHERN: &str = "northern";
    pub const OUTSIDE_GTA: &str = "outside_gta";
    pub const GTA: &str = "gta";
    pub const TORONTO: &str = "toronto";

    pub const PHD: &str = "phd";
    pub const MASTERS: &str = "masters";
    pub const DEGREE: &str = "degree";
    pub const DIPLOMA_2: &str = "diploma2";
    pub const POSTGRAD: &str = "postgrad";
    pub const DIPLOMA_1: &str = "diploma1";
    pub const CERT: &str = "cert";
    pub const NO_EDUCATION: &str = "none";

    pub const STRATEGIC_CATEGORY: &str = "health_trades_stem";
    pub const BUSINESS_CATEGORY: &str = "business_admin";
    pub const SERVICE_CATEGORY: &str = "sales_service_arts";

    pub const NO_CREDENTIALS: &str = "0";
    pub const ONE_CREDENTIAL: &str = "1";
    pub const MULTIPLE_CREDENTIALS: &str = "2+";
}

// ---------------------------------------------------------------------------
// Provincial points grid
// ---------------------------------------------------------------------------

pub static TEER_LEVELS: RuleTable<&str> = RuleTable {
    name: "teer",
    entries: &[
        entry("0", "TEER 0 (Management)", 10),
        entry("1", "TEER 1 (Professional)", 10),
        entry("2", "TEER 2 (Technical)", 8),
        entry("3", "TEER 3 (Skilled Trades)", 8),
        entry("4", "TEER 4 (Intermediate)", 0),
        entry("5", "TEER 5 (Labour)", 0),
    ],
};

pub static NOC_BROAD_CATEGORIES: RuleTable<&str> = RuleTable {
    name: "occupational_category",
    entries: &[
        entry(
            codes::STRATEGIC_CATEGORY,
            "Health, Trades, STEM, Transport, Manufacturing (NOC 0, 2, 3, 7, 8, 9)",
            10,
        ),
        entry(
            codes::BUSINESS_CATEGORY,
            "Business, Finance, Administration (NOC 1, 4)",
            5,
        ),
        entry(
            codes::SERVICE_CATEGORY,
            "Sales, Service, Arts, Culture (NOC 5, 6)",
            0,
        ),
    ],
};

/// Hourly wage bands
pub static WAGE_BANDS: RuleTable<f64> = RuleTable {
    name: "wage",
    entries: &[
        entry(40.0, "$40.00/hr or more (approx $80k/yr)", 10),
        entry(35.0, "$35.00 to $39.99/hr", 8),
        entry(30.0, "$30.00 to $34.99/hr", 7),
        entry(25.0, "$25.00 to $29.99/hr", 6),
        entry(20.0, "$20.00 to $24.99/hr", 5),
        entry(0.0, "Less than $20.00/hr", 0),
    ],
};

pub static EDUCATION_LEVELS: RuleTable<&str> = RuleTable {
    name: "education",
    entries: &[
        entry(codes::PHD, "PhD", 10),
        entry(codes::MASTERS, "Masters", 8),
        entry(codes::DEGREE, "Bachelors Degree (3+ years)", 6),
        entry(codes::DIPLOMA_2, "Diploma (2+ years)", 5),
        entry(codes::POSTGRAD, "Post-graduate Certificate (1+ year)", 5),
        entry(codes::DIPLOMA_1, "Diploma (1 year)", 3),
        entry(codes::CERT, "Certificate (Apprenticeship)", 3),
        entry(codes::NO_EDUCATION, "Secondary / None", 0),
    ],
};

pub static FIELDS_OF_STUDY: RuleTable<&str> = RuleTable {
    name: "field_of_study",
    entries: &[
        entry("stem_health", "STEM / Health (Engineering, Health, Math, CS)", 12),
        entry("trades", "Trades (Agriculture, Mechanics, Construction)", 12),
        entry("business_social", "Business, Social Science, Education, Law", 6),
        entry("arts_humanities", "Arts, Humanities", 0),
        entry("other", "Other", 0),
    ],
};

/// Shared by work location and study location
pub static REGIONS: RuleTable<&str> = RuleTable {
    name: "region",
    entries: &[
        entry(
            codes::NORTHERN,
            "Northern Ontario (e.g., Sudbury, Thunder Bay)",
            10,
        ),
        entry(
            codes::OUTSIDE_GTA,
            "Outside GTA (e.g., Hamilton, Waterloo, Ottawa)",
            8,
        ),
        entry(codes::GTA, "Inside GTA (Durham, Halton, Peel, York)", 3),
        entry(codes::TORONTO, "City of Toronto", 0),
    ],
};

pub static CANADIAN_CREDENTIALS: RuleTable<&str> = RuleTable {
    name: "canadian_credentials",
    entries: &[
        entry(
            codes::MULTIPLE_CREDENTIALS,
            "More than one Canadian credential",
            10,
        ),
        entry(codes::ONE_CREDENTIAL, "One Canadian credential", 5),
        entry(codes::NO_CREDENTIALS, "None", 0),
    ],
};

/// First official language ability for graduate streams
pub static CLB_LEVELS: RuleTable<u8> = RuleTable {
    name: "clb",
    entries: &[
        entry(9, "CLB 9 or higher", 10),
        entry(8, "CLB 8", 6),
        entry(7, "CLB 7", 4),
        entry(6, "CLB 6", 0),
        entry(0, "CLB 5 or lower", 0),
    ],
};

/// A National Occupational Classification code and its title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occupation {
    pub noc: &'static str,
    pub title: &'static str,
}

const fn occupation(noc: &'static str, title: &'static str) -> Occupation {
    Occupation { noc, title }
}

/// Occupations targeted by the Human Capital Priorities tech draws
pub static TECH_OCCUPATIONS: &[Occupation] = &[
    occupation("20012", "Computer and information systems managers"),
    occupation("21211", "Data Scientists"),
    occupation("21220", "Cybersecurity specialists"),
    occupation("21221", "Business systems specialists"),
    occupation("21222", "Information systems specialists"),
    occupation("21223", "Database analysts and data administrators"),
    occupation("21230", "Computer systems developers and programmers"),
    occupation("21231", "Software engineers and designers"),
    occupation("21232", "Software developers and programmers"),
    occupation("21233", "Web designers"),
    occupation("21234", "Web developers and programmers"),
    occupation(
        "21311",
        "Computer engineers (except software engineers and designers)",
    ),
    occupation("22220", "Computer network technicians"),
    occupation("22221", "User support technicians"),
    occupation("22222", "Information systems testing technicians"),
];

// ---------------------------------------------------------------------------
// Federal Comprehensive Ranking System
// ---------------------------------------------------------------------------

pub mod crs {
    use super::{codes, entry, RuleTable};

    pub static EDUCATION_SINGLE: RuleTable<&str> = RuleTable {
        name: "crs_education_single",
        entries: &[
            entry(codes::PHD, "PhD", 150),
            entry(codes::MASTERS, "Masters", 135),
            entry(codes::DEGREE, "Bachelors Degree", 120),
            entry(codes::DIPLOMA_2, "Diploma (2+ years)", 98),
            entry(codes::POSTGRAD, "Post-graduate Certificate", 90),
            entry(codes::DIPLOMA_1, "Diploma (1 year)", 90),
            entry(codes::CERT, "Certificate", 85),
            entry(codes::NO_EDUCATION, "Secondary / None", 0),
        ],
    };

    pub static EDUCATION_MARRIED: RuleTable<&str> = RuleTable {
        name: "crs_education_married",
        entries: &[
            entry(codes::PHD, "PhD", 140),
            entry(codes::MASTERS, "Masters", 126),
            entry(codes::DEGREE, "Bachelors Degree", 112),
            entry(codes::DIPLOMA_2, "Diploma (2+ years)", 91),
            entry(codes::POSTGRAD, "Post-graduate Certificate", 84),
            entry(codes::DIPLOMA_1, "Diploma (1 year)", 84),
            entry(codes::CERT, "Certificate", 80),
            entry(codes::NO_EDUCATION, "Secondary / None", 0),
        ],
    };

    /// Points per ability; four abilities are scored identically
    pub static LANGUAGE_SINGLE: RuleTable<u8> = RuleTable {
        name: "crs_language_single",
        entries: &[
            entry(10, "CLB 10 or higher", 34),
            entry(9, "CLB 9", 31),
            entry(8, "CLB 8", 23),
            entry(7, "CLB 7", 17),
            entry(6, "CLB 6", 9),
            entry(0, "CLB 5 or lower", 0),
        ],
    };

    pub static LANGUAGE_MARRIED: RuleTable<u8> = RuleTable {
        name: "crs_language_married",
        entries: &[
            entry(10, "CLB 10 or higher", 32),
            entry(9, "CLB 9", 29),
            entry(8, "CLB 8", 22),
            entry(7, "CLB 7", 16),
            entry(6, "CLB 6", 8),
            entry(0, "CLB 5 or lower", 0),
        ],
    };

    pub static CANADIAN_EXPERIENCE_SINGLE: RuleTable<u8> = RuleTable {
        name: "crs_canadian_experience_single",
        entries: &[
            entry(5, "5 years or more", 80),
            entry(4, "4 years", 72),
            entry(3, "3 years", 64),
            entry(2, "2 years", 53),
            entry(1, "1 year", 40),
            entry(0, "None", 0),
        ],
    };

    pub static CANADIAN_EXPERIENCE_MARRIED: RuleTable<u8> = RuleTable {
        name: "crs_canadian_experience_married",
        entries: &[
            entry(5, "5 years or more", 70),
            entry(4, "4 years", 63),
            entry(3, "3 years", 56),
            entry(2, "2 years", 46),
            entry(1, "1 year", 35),
            entry(0, "None", 0),
        ],
    };

    pub static SPOUSE_EDUCATION: RuleTable<&str> = RuleTable {
        name: "crs_spouse_education",
        entries: &[
            entry(codes::PHD, "PhD", 10),
            entry(codes::MASTERS, "Masters", 10),
            entry(codes::DEGREE, "Bachelors Degree", 8),
            entry(codes::DIPLOMA_2, "Diploma (2+ years)", 7),
            entry(codes::POSTGRAD, "Post-graduate Certificate", 6),
            entry(codes::DIPLOMA_1, "Diploma (1 year)", 6),
            entry(codes::CERT, "Certificate", 2),
            entry(codes::NO_EDUCATION, "Secondary / None", 0),
        ],
    };

    /// Points per ability
    pub static SPOUSE_LANGUAGE: RuleTable<u8> = RuleTable {
        name: "crs_spouse_language",
        entries: &[
            entry(9, "CLB 9 or higher", 5),
            entry(7, "CLB 7 or 8", 3),
            entry(5, "CLB 5 or 6", 1),
            entry(0, "CLB 4 or lower", 0),
        ],
    };

    pub static SPOUSE_CANADIAN_EXPERIENCE: RuleTable<u8> = RuleTable {
        name: "crs_spouse_canadian_experience",
        entries: &[
            entry(5, "5 years or more", 10),
            entry(4, "4 years", 9),
            entry(3, "3 years", 8),
            entry(2, "2 years", 7),
            entry(1, "1 year", 5),
            entry(0, "None", 0),
        ],
    };

    /// Certificate of qualification combined with language
    pub static TRADE_CERTIFICATE: RuleTable<u8> = RuleTable {
        name: "crs_trade_certificate",
        entries: &[
            entry(7, "CLB 7 or higher", 50),
            entry(5, "CLB 5 or 6", 25),
            entry(0, "CLB 4 or lower", 0),
        ],
    };

    /// Education levels counted as two or more years of post-secondary
    pub const HIGH_EDUCATION: [&str; 4] =
        [codes::PHD, codes::MASTERS, codes::DEGREE, codes::DIPLOMA_2];

    /// Education levels counted as one year of post-secondary
    pub const MEDIUM_EDUCATION: [&str; 2] = [codes::DIPLOMA_1, codes::POSTGRAD];

    /// Education levels earning the larger Canadian study bonus
    pub const DEGREE_OR_ABOVE: [&str; 3] = [codes::DEGREE, codes::MASTERS, codes::PHD];
}
