use chrono::Weekday;
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("Unknown {kind} class: {value}")]
pub struct UnknownCareClass {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed care enumeration stored as a text column. Each variant
/// carries its storage key, icon, summary and description.
macro_rules! care_class {
    (
        $name:ident, $kind:literal,
        { $($variant:ident => ($key:literal, $icon:literal, $summary:literal, $description:literal)),+ $(,)? }
    ) => {
        #[derive(AsExpression, Clone, Copy, Debug, Eq, FromSqlRow, PartialEq, Serialize, Deserialize)]
        #[diesel(sql_type = Text)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn key(&self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            pub fn icon(&self) -> &'static str {
                match self {
                    $($name::$variant => $icon),+
                }
            }

            pub fn summary(&self) -> &'static str {
                match self {
                    $($name::$variant => $summary),+
                }
            }

            pub fn description(&self) -> &'static str {
                match self {
                    $($name::$variant => $description),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.key())
            }
        }

        impl FromStr for $name {
            type Err = UnknownCareClass;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($key => Ok($name::$variant),)+
                    other => Err(UnknownCareClass {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl ToSql<Text, Sqlite> for $name {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
                <str as ToSql<Text, Sqlite>>::to_sql(self.key(), out)
            }
        }

        impl FromSql<Text, Sqlite> for $name {
            fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
                let value = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;

                Ok(value.parse()?)
            }
        }
    };
}

care_class!(WaterClass, "water", {
    Daily => (
        "daily",
        "img/water/daily.png",
        "Water daily",
        "Keep the soil consistently moist. Water a little every day."
    ),
    EveryOtherDay => (
        "every_other_day",
        "img/water/every_other_day.png",
        "Water every other day",
        "Let the top of the soil dry slightly between waterings."
    ),
    EveryThreeDays => (
        "every_three_days",
        "img/water/every_three_days.png",
        "Water every 3 days",
        "Water thoroughly, then let the top inch of soil dry out."
    ),
    TwiceWeekly => (
        "twice_weekly",
        "img/water/twice_weekly.png",
        "Water twice a week",
        "Water deeply twice a week and drain any standing water."
    ),
    Weekly => (
        "weekly",
        "img/water/weekly.png",
        "Water once a week",
        "Soak the soil once a week and let it dry out in between."
    ),
    WhenDry => (
        "when_dry",
        "img/water/when_dry.png",
        "Water when dry",
        "Only water when the soil is completely dry to the touch."
    ),
});

care_class!(SunClass, "sun", {
    FullSun => (
        "full_sun",
        "img/sun/full_sun.png",
        "Full sun",
        "Needs at least six hours of direct sunlight a day."
    ),
    PartialSun => (
        "partial_sun",
        "img/sun/partial_sun.png",
        "Partial sun",
        "Prefers a few hours of direct morning sun and shade in the afternoon."
    ),
    BrightIndirect => (
        "bright_indirect",
        "img/sun/bright_indirect.png",
        "Bright indirect light",
        "Place near a bright window but out of the direct sun."
    ),
    LowLight => (
        "low_light",
        "img/sun/low_light.png",
        "Low light",
        "Tolerates shady corners and north-facing windows."
    ),
});

care_class!(HumidityClass, "humidity", {
    High => (
        "high",
        "img/humidity/high.png",
        "High humidity",
        "Mist regularly or keep near a humidifier or pebble tray."
    ),
    Medium => (
        "medium",
        "img/humidity/medium.png",
        "Average humidity",
        "Normal household humidity is fine."
    ),
    Low => (
        "low",
        "img/humidity/low.png",
        "Low humidity",
        "Prefers dry air. Avoid misting."
    ),
});

care_class!(TemperatureClass, "temperature", {
    Warm => (
        "warm",
        "img/temperature/warm.png",
        "Warm",
        "Keep between 70°F and 85°F and away from cold drafts."
    ),
    Average => (
        "average",
        "img/temperature/average.png",
        "Average",
        "Comfortable between 60°F and 75°F."
    ),
    Cool => (
        "cool",
        "img/temperature/cool.png",
        "Cool",
        "Thrives between 50°F and 65°F."
    ),
});

impl WaterClass {
    /// Weekdays on which a plant of this class should be watered.
    pub fn watering_days(&self) -> &'static [Weekday] {
        use Weekday::*;

        match self {
            WaterClass::Daily => &[Mon, Tue, Wed, Thu, Fri, Sat, Sun],
            WaterClass::EveryOtherDay => &[Mon, Wed, Fri, Sun],
            WaterClass::EveryThreeDays => &[Mon, Thu, Sun],
            WaterClass::TwiceWeekly => &[Tue, Fri],
            WaterClass::Weekly => &[Sun],
            WaterClass::WhenDry => &[],
        }
    }
}
