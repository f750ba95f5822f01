// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Register map for the two syscon regions the glue touches: the NSS common
//! block (clocking and per-GMAC control) and the QSGMII CSR block (PCS and
//! SerDes analog settings).
//!
//! Per-GMAC fields live in shared registers, so most of what's here is a
//! function of the [GmacId].

use crate::config::{GmacId, Iface};
use bitflags::bitflags;

////////////////////////////////////////////////////////////////////////////////
// NSS common

pub const NSS_COMMON_CLK_GATE: u32 = 0x8;
pub const NSS_COMMON_CLK_DIV0: u32 = 0xc;
pub const NSS_COMMON_CLK_SRC_CTRL: u32 = 0x14;

pub const NSS_COMMON_CLK_DIV_MASK: u32 = 0x7f;

pub fn clk_gate_ptp_en(id: GmacId) -> u32 {
    1 << (0x10 + u32::from(id.index()))
}

pub fn clk_gate_rgmii_rx_en(id: GmacId) -> u32 {
    1 << (0x9 + u32::from(id.index()) * 2)
}

pub fn clk_gate_rgmii_tx_en(id: GmacId) -> u32 {
    1 << (0x8 + u32::from(id.index()) * 2)
}

pub fn clk_gate_gmii_rx_en(id: GmacId) -> u32 {
    1 << (0x4 + u32::from(id.index()))
}

pub fn clk_gate_gmii_tx_en(id: GmacId) -> u32 {
    1 << u32::from(id.index())
}

/// Each GMAC owns one byte of `CLK_DIV0`, of which the low 7 bits are used
pub fn clk_div_shift(id: GmacId) -> u32 {
    u32::from(id.index()) * 8
}

pub fn clk_src_ctrl_shift(id: GmacId) -> u32 {
    u32::from(id.index())
}

/// The clock source select is a single bit whose meaning depends on the MAC:
///
/// - MAC0: QSGMII=0 RGMII=1
/// - MAC1: QSGMII=0 SGMII=0 RGMII=1
/// - MAC2 & MAC3: QSGMII=0 SGMII=1
pub fn clk_src_ctrl_sel(id: GmacId, iface: Iface) -> u32 {
    match iface {
        Iface::Rgmii => 1,
        Iface::Sgmii => u32::from(id.index() >= 2),
    }
}

pub fn gmac_ctl(id: GmacId) -> u32 {
    0x30 + u32::from(id.index()) * 4
}

pub const GMAC_CTL_IFG_SHIFT: u32 = 0;
pub const GMAC_CTL_IFG_LIMIT_SHIFT: u32 = 8;

bitflags! {
    /// Single-bit controls in `NSS_COMMON_GMAC_CTL(x)`
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct GmacCtl: u32 {
        /// Selects the RGMII pins; cleared for SGMII
        const PHY_IFACE_SEL = 1 << 16;
        /// AXI low power exit request
        const CSYS_REQ = 1 << 19;
    }
}

////////////////////////////////////////////////////////////////////////////////
// QSGMII CSR

pub const QSGMII_PCS_ALL_CH_CTL: u32 = 0x80;
pub const QSGMII_PCS_CAL_LCKDT_CTL: u32 = 0x120;
pub const QSGMII_PCS_CAL_LCKDT_CTL_RST: u32 = 1 << 19;

bitflags! {
    /// One 4-bit channel slot in `QSGMII_PCS_ALL_CH_CTL`.  A speed of 10M is
    /// encoded as neither speed bit being set.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct PcsChCtl: u32 {
        const SPEED_FORCE = 1 << 1;
        const SPEED_100 = 1 << 2;
        const SPEED_1000 = 1 << 3;
    }
}

pub fn pcs_ch_speed_shift(id: GmacId) -> u32 {
    u32::from(id.index()) * 4
}

/// Only GMAC1/2/3 have a SerDes, and their control registers are not
/// contiguous.  Returns `None` for GMAC0.
pub fn qsgmii_phy_sgmii_ctl(id: GmacId) -> Option<u32> {
    match id.index() {
        0 => None,
        1 => Some(0x134),
        x => Some(0x13c + 4 * (u32::from(x) - 2)),
    }
}

bitflags! {
    /// Enable bits in `QSGMII_PHY_SGMII_CTL(x)`; the multi-bit tuning fields
    /// of the same register are described by the `QSGMII_PHY_*` masks below.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct SgmiiCtl: u32 {
        const CDR_EN = 1 << 0;
        const RX_FRONT_EN = 1 << 1;
        const RX_SIGNAL_DETECT_EN = 1 << 2;
        const TX_DRIVER_EN = 1 << 3;
        const QSGMII_EN = 1 << 7;
    }
}

/// A multi-bit field, given as (shift, width)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub shift: u32,
    pub width: u32,
}

impl Field {
    pub const fn mask(&self) -> u32 {
        ((1 << self.width) - 1) << self.shift
    }

    /// Places `v` in the field, discarding any bits that don't fit
    pub const fn prep(&self, v: u32) -> u32 {
        (v << self.shift) & self.mask()
    }

    pub const fn get(&self, reg: u32) -> u32 {
        (reg & self.mask()) >> self.shift
    }
}

pub const QSGMII_PHY_DEEMPHASIS_LVL: Field = Field { shift: 10, width: 2 };
pub const QSGMII_PHY_PHASE_LOOP_GAIN: Field = Field { shift: 12, width: 3 };
pub const QSGMII_PHY_RX_DC_BIAS: Field = Field { shift: 18, width: 2 };
pub const QSGMII_PHY_RX_INPUT_EQU: Field = Field { shift: 20, width: 2 };
pub const QSGMII_PHY_CDR_PI_SLEW: Field = Field { shift: 22, width: 2 };
pub const QSGMII_PHY_TX_SLEW: Field = Field { shift: 26, width: 2 };
pub const QSGMII_PHY_TX_DRV_AMP: Field = Field { shift: 28, width: 4 };
