//! The closed morph-name vocabulary.
//!
//! Downstream consumers bind UI sliders to these keys, so the set is fixed at
//! compile time and an unknown name in a catalog file is a load error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! morph_names {
    ($($variant:ident => $key:literal),+ $(,)?) => {
        /// Stable identifier of a morph target.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum MorphName {
            $(
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl MorphName {
            /// Every name, in slider order.
            pub const ALL: &'static [MorphName] = &[$(MorphName::$variant),+];

            /// The exported key, e.g. `"EyeSize"` or `"Build_Heavy"`.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(MorphName::$variant => $key,)+
                }
            }
        }

        impl FromStr for MorphName {
            type Err = UnknownMorphName;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($key => Ok(MorphName::$variant),)+
                    _ => Err(UnknownMorphName(s.to_string())),
                }
            }
        }
    };
}

morph_names! {
    EyeSize => "EyeSize",
    EyeSpacing => "EyeSpacing",
    EyeTilt => "EyeTilt",
    EyeDepth => "EyeDepth",
    UpperEyelid => "UpperEyelid",
    LowerEyelid => "LowerEyelid",
    EyebrowHeight => "EyebrowHeight",
    EyebrowArch => "EyebrowArch",
    NoseWidth => "NoseWidth",
    NoseLength => "NoseLength",
    NoseBridge => "NoseBridge",
    NoseTip => "NoseTip",
    NostrilFlare => "NostrilFlare",
    NoseProfile => "NoseProfile",
    MouthWidth => "MouthWidth",
    UpperLipSize => "UpperLipSize",
    LowerLipSize => "LowerLipSize",
    LipFullness => "LipFullness",
    MouthCorners => "MouthCorners",
    JawWidth => "JawWidth",
    ChinLength => "ChinLength",
    ChinProtrusion => "ChinProtrusion",
    ChinCleft => "ChinCleft",
    FaceLength => "FaceLength",
    ForeheadHeight => "ForeheadHeight",
    CheekboneHeight => "CheekboneHeight",
    BuildSlim => "Build_Slim",
    BuildAthletic => "Build_Athletic",
    BuildHeavy => "Build_Heavy",
}

impl fmt::Display for MorphName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string outside the morph vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown morph name: {0}")]
pub struct UnknownMorphName(pub String);
