//! Sensor Columns of a Wearable Recording
//!
//! A recording row carries raw inertial axes, orientation angles and a set of
//! derived magnitudes. Column names follow the spreadsheet export:
//!
//! ```text
//! ACC_X  ACC_Y  ACC_Z      accelerometer (g)
//! JERK_X JERK_Y JERK_Z     derivative of acceleration
//! GYRO_X GYRO_Y GYRO_Z     angular rate
//! PITCH  ROLL              orientation (degrees)
//! SVM                      signal vector magnitude
//! ACC_MAG JERK_MAG GYRO_MAG  per-sensor magnitudes
//! ```
//!
//! The optional `LABEL` column is not a sensor field; see [`LABEL_COLUMN`].

use core::fmt;

use serde::{Deserialize, Serialize};

/// Number of sensor fields per sample
pub const FIELD_COUNT: usize = 15;

/// Column holding ground-truth labels, when the recording has one
pub const LABEL_COLUMN: &str = "LABEL";

/// Column holding the sample timestamp, when the recording has one
pub const TIMESTAMP_COLUMN: &str = "TIMESTAMP";

/// One numeric column of a recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorField {
    /// Acceleration, x axis
    AccX,
    /// Acceleration, y axis
    AccY,
    /// Acceleration, z axis
    AccZ,
    /// Jerk (derivative of acceleration), x axis
    JerkX,
    /// Jerk, y axis
    JerkY,
    /// Jerk, z axis
    JerkZ,
    /// Angular rate, x axis
    GyroX,
    /// Angular rate, y axis
    GyroY,
    /// Angular rate, z axis
    GyroZ,
    /// Pitch angle
    Pitch,
    /// Roll angle
    Roll,
    /// Signal vector magnitude
    Svm,
    /// Acceleration magnitude
    AccMag,
    /// Jerk magnitude
    JerkMag,
    /// Angular rate magnitude
    GyroMag,
}

/// Model input columns, in matrix column order
pub const FEATURE_FIELDS: [SensorField; 12] = [
    SensorField::AccX,
    SensorField::AccY,
    SensorField::AccZ,
    SensorField::JerkX,
    SensorField::JerkY,
    SensorField::JerkZ,
    SensorField::GyroX,
    SensorField::GyroY,
    SensorField::GyroZ,
    SensorField::Pitch,
    SensorField::Roll,
    SensorField::Svm,
];

/// Columns summarised per label in distribution reports
pub const DISTRIBUTION_FIELDS: [SensorField; 6] = [
    SensorField::AccMag,
    SensorField::JerkMag,
    SensorField::GyroMag,
    SensorField::Pitch,
    SensorField::Roll,
    SensorField::Svm,
];

impl SensorField {
    /// Every field, in storage order
    pub const ALL: [SensorField; FIELD_COUNT] = [
        SensorField::AccX,
        SensorField::AccY,
        SensorField::AccZ,
        SensorField::JerkX,
        SensorField::JerkY,
        SensorField::JerkZ,
        SensorField::GyroX,
        SensorField::GyroY,
        SensorField::GyroZ,
        SensorField::Pitch,
        SensorField::Roll,
        SensorField::Svm,
        SensorField::AccMag,
        SensorField::JerkMag,
        SensorField::GyroMag,
    ];

    /// Column name as it appears in the spreadsheet header
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::AccX => "ACC_X",
            Self::AccY => "ACC_Y",
            Self::AccZ => "ACC_Z",
            Self::JerkX => "JERK_X",
            Self::JerkY => "JERK_Y",
            Self::JerkZ => "JERK_Z",
            Self::GyroX => "GYRO_X",
            Self::GyroY => "GYRO_Y",
            Self::GyroZ => "GYRO_Z",
            Self::Pitch => "PITCH",
            Self::Roll => "ROLL",
            Self::Svm => "SVM",
            Self::AccMag => "ACC_MAG",
            Self::JerkMag => "JERK_MAG",
            Self::GyroMag => "GYRO_MAG",
        }
    }

    /// Storage slot inside a [`Sample`](crate::dataset::Sample)
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parse a header cell, ignoring case and surrounding whitespace
    pub fn from_column(name: &str) -> Option<Self> {
        let name = name.trim().trim_matches('"');
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.column_name().eq_ignore_ascii_case(name))
    }

    /// Whether this field is a derived magnitude usable for thresholding
    pub const fn is_magnitude(self) -> bool {
        matches!(self, Self::Svm | Self::AccMag | Self::JerkMag | Self::GyroMag)
    }
}

impl fmt::Display for SensorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}
