// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error type shared by the configuration resolver, the register programmer
//! and the probe path.

use crate::config::PhyInterfaceMode;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GmacError {
    /// The `qcom,id` property is missing from the device node
    MissingId,
    /// `qcom,id` is outside of 0..=3
    InvalidId(u32),
    /// No `stmmaceth` clock could be obtained
    MissingCoreClock,
    /// No `qcom,nss-common` syscon could be obtained
    MissingNssCommon,
    /// No `qcom,qsgmii-csr` syscon could be obtained, but the port runs SGMII
    MissingQsgmiiCsr,

    UnsupportedInterface(PhyInterfaceMode),
    /// `speed` is in Mbps, exactly as it was handed to us
    UnsupportedSpeed {
        mode: PhyInterfaceMode,
        speed: u32,
    },
    /// GMAC 0 has no SerDes attached and can't run SGMII
    InvalidInstanceForMode {
        id: u8,
    },

    MissingFixedLinkSpeed,
    UnsupportedFixedLinkSpeed(u32),

    /// The register backend failed to complete an access
    RegisterAccess {
        offset: u32,
    },
    /// The generic MAC core rejected the hand-off
    CoreProbe,
}
