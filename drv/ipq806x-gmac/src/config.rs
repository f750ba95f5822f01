// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static configuration of one GMAC, as described by its device-tree node
use crate::GmacError;
use core::fmt;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{de, Deserialize, Deserializer};

/// Number of GMAC controllers sharing the NSS common block.
pub const GMAC_COUNT: u8 = 4;

/// PHY interface modes, named as in the `phy-mode` device-tree property.
///
/// Only the RGMII family and SGMII can actually be wired up by this glue; the
/// other variants exist so that a valid-but-unsupported mode is reported as
/// such instead of failing to parse.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PhyInterfaceMode {
    Internal,
    Mii,
    Gmii,
    Sgmii,
    Tbi,
    RevMii,
    Rmii,
    RevRmii,
    Rgmii,
    RgmiiId,
    RgmiiRxid,
    RgmiiTxid,
    Rtbi,
    Smii,
    Xgmii,
    Xlgmii,
    Moca,
    Psgmii,
    Qsgmii,
    Trgmii,
    Base100X,
    Base1000X,
    Base2500X,
    Base5GR,
    Rxaui,
    Xaui,
    Base10GR,
    Base10GKr,
    Usxgmii,
    Base25GR,
}

const PHY_MODE_NAMES: [(PhyInterfaceMode, &str); 30] = [
    (PhyInterfaceMode::Internal, "internal"),
    (PhyInterfaceMode::Mii, "mii"),
    (PhyInterfaceMode::Gmii, "gmii"),
    (PhyInterfaceMode::Sgmii, "sgmii"),
    (PhyInterfaceMode::Tbi, "tbi"),
    (PhyInterfaceMode::RevMii, "rev-mii"),
    (PhyInterfaceMode::Rmii, "rmii"),
    (PhyInterfaceMode::RevRmii, "rev-rmii"),
    (PhyInterfaceMode::Rgmii, "rgmii"),
    (PhyInterfaceMode::RgmiiId, "rgmii-id"),
    (PhyInterfaceMode::RgmiiRxid, "rgmii-rxid"),
    (PhyInterfaceMode::RgmiiTxid, "rgmii-txid"),
    (PhyInterfaceMode::Rtbi, "rtbi"),
    (PhyInterfaceMode::Smii, "smii"),
    (PhyInterfaceMode::Xgmii, "xgmii"),
    (PhyInterfaceMode::Xlgmii, "xlgmii"),
    (PhyInterfaceMode::Moca, "moca"),
    (PhyInterfaceMode::Psgmii, "psgmii"),
    (PhyInterfaceMode::Qsgmii, "qsgmii"),
    (PhyInterfaceMode::Trgmii, "trgmii"),
    (PhyInterfaceMode::Base100X, "100base-x"),
    (PhyInterfaceMode::Base1000X, "1000base-x"),
    (PhyInterfaceMode::Base2500X, "2500base-x"),
    (PhyInterfaceMode::Base5GR, "5gbase-r"),
    (PhyInterfaceMode::Rxaui, "rxaui"),
    (PhyInterfaceMode::Xaui, "xaui"),
    (PhyInterfaceMode::Base10GR, "10gbase-r"),
    (PhyInterfaceMode::Base10GKr, "10gbase-kr"),
    (PhyInterfaceMode::Usxgmii, "usxgmii"),
    (PhyInterfaceMode::Base25GR, "25gbase-r"),
];

impl PhyInterfaceMode {
    pub fn name(&self) -> &'static str {
        PHY_MODE_NAMES
            .iter()
            .find(|(m, _)| m == self)
            .map(|(_, n)| *n)
            .unwrap_or("unknown")
    }

    pub fn from_name(name: &str) -> Option<Self> {
        PHY_MODE_NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(m, _)| *m)
    }

    /// Decides which side of the NSS clocking this mode is wired to, or
    /// `None` if the glue can't drive it at all.
    pub fn iface(&self) -> Option<Iface> {
        match self {
            PhyInterfaceMode::Rgmii
            | PhyInterfaceMode::RgmiiId
            | PhyInterfaceMode::RgmiiRxid
            | PhyInterfaceMode::RgmiiTxid => Some(Iface::Rgmii),
            PhyInterfaceMode::Sgmii => Some(Iface::Sgmii),
            _ => None,
        }
    }

    /// Like [Self::iface], but turns an unsupported mode into an error
    pub fn supported_iface(&self) -> Result<Iface, GmacError> {
        self.iface()
            .ok_or(GmacError::UnsupportedInterface(*self))
    }
}

impl fmt::Display for PhyInterfaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'de> Deserialize<'de> for PhyInterfaceMode {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct ModeVisitor;
        impl de::Visitor<'_> for ModeVisitor {
            type Value = PhyInterfaceMode;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a PHY interface mode name")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                PhyInterfaceMode::from_name(v).ok_or_else(|| {
                    de::Error::invalid_value(de::Unexpected::Str(v), &self)
                })
            }
        }
        d.deserialize_str(ModeVisitor)
    }
}

/// The two interface families the NSS block distinguishes. All four RGMII
/// delay variants are identical from the glue's point of view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Iface {
    Rgmii,
    Sgmii,
}

/// Link speed; the discriminant is the speed in Mbps.
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
pub enum Speed {
    Speed10M = 10,
    Speed100M = 100,
    Speed1G = 1000,
}

impl Speed {
    pub fn from_mbps(mbps: u32) -> Option<Self> {
        Self::from_u32(mbps)
    }

    pub fn mbps(&self) -> u32 {
        *self as u32
    }
}

/// Index of a GMAC within the NSS block.  The documentation numbers them 1 to
/// 4; we count from 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GmacId(u8);

impl GmacId {
    pub fn new(id: u32) -> Result<Self, GmacError> {
        if id < u32::from(GMAC_COUNT) {
            Ok(Self(id as u8))
        } else {
            Err(GmacError::InvalidId(id))
        }
    }

    pub fn index(&self) -> u8 {
        self.0
    }
}

/// Contents of a `fixed-link` child node
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct FixedLink {
    #[serde(default)]
    pub speed: Option<u32>,
    #[serde(rename = "full-duplex", default)]
    pub full_duplex: bool,
}

impl FixedLink {
    pub fn speed(&self) -> Result<Speed, GmacError> {
        let mbps = self.speed.ok_or(GmacError::MissingFixedLinkSpeed)?;
        Speed::from_mbps(mbps)
            .ok_or(GmacError::UnsupportedFixedLinkSpeed(mbps))
    }
}

/// Properties read from the GMAC's device-tree node.  Clock and syscon
/// handles aren't part of this; they're looked up through
/// [crate::stmmac::Platform] by name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GmacConfig {
    #[serde(rename = "qcom,id", default)]
    pub id: Option<u32>,
    #[serde(rename = "phy-mode")]
    pub phy_mode: PhyInterfaceMode,
    #[serde(rename = "fixed-link", default)]
    pub fixed_link: Option<FixedLink>,
}

impl GmacConfig {
    pub fn new(id: u32, phy_mode: PhyInterfaceMode) -> Self {
        Self {
            id: Some(id),
            phy_mode,
            fixed_link: None,
        }
    }

    pub fn with_fixed_link(mut self, speed: u32) -> Self {
        self.fixed_link = Some(FixedLink {
            speed: Some(speed),
            full_duplex: true,
        });
        self
    }

    /// Validates `qcom,id`, which is mandatory
    pub fn gmac_id(&self) -> Result<GmacId, GmacError> {
        GmacId::new(self.id.ok_or(GmacError::MissingId)?)
    }

    /// Returns the forced speed, if this port is a fixed link
    pub fn fixed_speed(&self) -> Result<Option<Speed>, GmacError> {
        self.fixed_link.as_ref().map(FixedLink::speed).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_names_round_trip() {
        for (mode, name) in PHY_MODE_NAMES {
            assert_eq!(mode.name(), name);
            assert_eq!(PhyInterfaceMode::from_name(name), Some(mode));
        }
        assert_eq!(
            PhyInterfaceMode::from_name("RGMII-ID"),
            Some(PhyInterfaceMode::RgmiiId)
        );
        assert_eq!(PhyInterfaceMode::from_name("rgmii-yes"), None);
    }

    #[test]
    fn iface_classes() {
        use PhyInterfaceMode::*;
        for m in [Rgmii, RgmiiId, RgmiiRxid, RgmiiTxid] {
            assert_eq!(m.iface(), Some(Iface::Rgmii));
        }
        assert_eq!(Sgmii.iface(), Some(Iface::Sgmii));
        assert_eq!(
            Qsgmii.supported_iface(),
            Err(GmacError::UnsupportedInterface(Qsgmii))
        );
        assert_eq!(Rmii.iface(), None);
    }

    #[test]
    fn gmac_id_range() {
        assert_eq!(GmacId::new(3).map(|g| g.index()), Ok(3));
        assert_eq!(GmacId::new(4), Err(GmacError::InvalidId(4)));
        let mut cfg = GmacConfig::new(0, PhyInterfaceMode::Rgmii);
        cfg.id = None;
        assert_eq!(cfg.gmac_id(), Err(GmacError::MissingId));
    }

    #[test]
    fn speed_from_mbps() {
        assert_eq!(Speed::from_mbps(100), Some(Speed::Speed100M));
        assert_eq!(Speed::from_mbps(2500), None);
        assert_eq!(Speed::Speed1G.mbps(), 1000);
    }

    #[test]
    fn parse_node() {
        let cfg: GmacConfig = toml::from_str(
            r#"
            "qcom,id" = 2
            "phy-mode" = "sgmii"

            [fixed-link]
            speed = 1000
            full-duplex = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.gmac_id().unwrap().index(), 2);
        assert_eq!(cfg.phy_mode, PhyInterfaceMode::Sgmii);
        assert_eq!(cfg.fixed_speed(), Ok(Some(Speed::Speed1G)));

        let cfg: GmacConfig = toml::from_str(r#""phy-mode" = "rgmii-txid""#)
            .unwrap();
        assert_eq!(cfg.id, None);
        assert_eq!(cfg.fixed_speed(), Ok(None));

        let bogus = toml::from_str::<GmacConfig>(r#""phy-mode" = "bogus""#);
        assert!(bogus.is_err());
    }

    #[test]
    fn fixed_link_speed() {
        let link = FixedLink::default();
        assert_eq!(link.speed(), Err(GmacError::MissingFixedLinkSpeed));
        let cfg =
            GmacConfig::new(1, PhyInterfaceMode::Sgmii).with_fixed_link(25);
        assert_eq!(
            cfg.fixed_speed(),
            Err(GmacError::UnsupportedFixedLinkSpeed(25))
        );
    }
}
