//! Weapon classes and the per-class table of optional stats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WeaponClass {
    Hg,
    Smg,
    Ar,
    Rf,
    Mg,
    Sg,
}

/// How a class reports the magnitudes of its aura buffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuffValueShape {
    /// One list of values per buff, one value per dummy-link level.
    PerLevel,
    /// One value per buff.
    Flat,
}

/// Which class-dependent fields a class carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassTraits {
    pub has_armor: bool,
    pub has_mag_size: bool,
    pub buff_values: BuffValueShape,
}

const fn traits(has_armor: bool, has_mag_size: bool, buff_values: BuffValueShape) -> ClassTraits {
    ClassTraits {
        has_armor,
        has_mag_size,
        buff_values,
    }
}

static CLASS_TABLE: &[(WeaponClass, &str, ClassTraits)] = &[
    (WeaponClass::Hg, "HG", traits(false, false, BuffValueShape::PerLevel)),
    (WeaponClass::Smg, "SMG", traits(false, false, BuffValueShape::Flat)),
    (WeaponClass::Ar, "AR", traits(false, false, BuffValueShape::Flat)),
    (WeaponClass::Rf, "RF", traits(false, false, BuffValueShape::Flat)),
    (WeaponClass::Mg, "MG", traits(false, true, BuffValueShape::Flat)),
    (WeaponClass::Sg, "SG", traits(true, true, BuffValueShape::Flat)),
];

impl WeaponClass {
    pub const ALL: [WeaponClass; 6] = [
        WeaponClass::Hg,
        WeaponClass::Smg,
        WeaponClass::Ar,
        WeaponClass::Rf,
        WeaponClass::Mg,
        WeaponClass::Sg,
    ];

    fn entry(self) -> &'static (WeaponClass, &'static str, ClassTraits) {
        CLASS_TABLE
            .iter()
            .find(|(class, _, _)| *class == self)
            .unwrap_or(&CLASS_TABLE[0])
    }

    /// The code used on the wiki and in saved records, e.g. `"SMG"`.
    pub fn code(self) -> &'static str {
        self.entry().1
    }

    pub fn traits(self) -> ClassTraits {
        self.entry().2
    }
}

impl fmt::Display for WeaponClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for WeaponClass {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CLASS_TABLE
            .iter()
            .find(|(_, code, _)| *code == s)
            .map(|(class, _, _)| *class)
            .ok_or_else(|| ExtractError::UnknownWeaponClass(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_from_str() {
        for class in WeaponClass::ALL {
            assert_eq!(class.code().parse::<WeaponClass>().unwrap(), class);
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        let err = "LMG".parse::<WeaponClass>().unwrap_err();
        assert!(matches!(err, ExtractError::UnknownWeaponClass(code) if code == "LMG"));
        assert!("hg".parse::<WeaponClass>().is_err());
    }

    #[test]
    fn only_shotguns_have_armor() {
        for class in WeaponClass::ALL {
            assert_eq!(class.traits().has_armor, class == WeaponClass::Sg, "{class}");
        }
    }

    #[test]
    fn shotguns_and_machine_guns_have_magazines() {
        for class in WeaponClass::ALL {
            let expected = matches!(class, WeaponClass::Sg | WeaponClass::Mg);
            assert_eq!(class.traits().has_mag_size, expected, "{class}");
        }
    }

    #[test]
    fn handguns_report_per_level_values() {
        assert_eq!(WeaponClass::Hg.traits().buff_values, BuffValueShape::PerLevel);
        assert_eq!(WeaponClass::Ar.traits().buff_values, BuffValueShape::Flat);
    }

    #[test]
    fn serializes_as_uppercase_code() {
        assert_eq!(serde_json::to_string(&WeaponClass::Smg).unwrap(), "\"SMG\"");
        let class: WeaponClass = serde_json::from_str("\"RF\"").unwrap();
        assert_eq!(class, WeaponClass::Rf);
    }
}
