// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SerDes analog tuning and PCS speed forcing for the GMACs that run SGMII
//! through the QSGMII block.
use crate::config::{GmacId, Speed};
use crate::regs::{self, PcsChCtl, SgmiiCtl};
use crate::soc::SiliconRevision;
use crate::GmacError;

/// Values for the `QSGMII_PHY_SGMII_CTL(x)` register of one GMAC.  Only the
/// TX drive and RX bias settings vary between ports; everything else is
/// common to all of them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SerdesParams {
    pub tx_drv_amp: u32,
    pub tx_slew: u32,
    pub deemphasis_lvl: u32,
    pub rx_dc_bias: u32,
    pub phase_loop_gain: u32,
    pub rx_input_equ: u32,
    pub cdr_pi_slew: u32,
    pub enables: SgmiiCtl,
}

// tx_drv_amp, tx_slew, deemphasis_lvl, rx_dc_bias
struct PortPreset(u32, u32, u32, u32);

const GMAC1_V1: PortPreset = PortPreset(0xc, 0x2, 0x2, 0x2);
const GMAC1: PortPreset = PortPreset(0xd, 0x0, 0x0, 0x2);
const GMAC2_3: PortPreset = PortPreset(0xc, 0x0, 0x0, 0x3);

impl SerdesParams {
    /// Picks the tuning for the SerDes attached to `id`.  GMAC1 was retuned
    /// after the first silicon revision, so it depends on `rev`.
    ///
    /// GMAC0 has no SerDes; asking for it is an error.
    pub fn new(id: GmacId, rev: SiliconRevision) -> Result<Self, GmacError> {
        let preset = match (id.index(), rev) {
            (1, SiliconRevision::V1) => GMAC1_V1,
            (1, SiliconRevision::Other) => GMAC1,
            (2 | 3, _) => GMAC2_3,
            (id, _) => return Err(GmacError::InvalidInstanceForMode { id }),
        };
        let PortPreset(tx_drv_amp, tx_slew, deemphasis_lvl, rx_dc_bias) =
            preset;
        Ok(Self {
            tx_drv_amp,
            tx_slew,
            deemphasis_lvl,
            rx_dc_bias,
            phase_loop_gain: 0x4,
            rx_input_equ: 0x1,
            cdr_pi_slew: 0x2,
            enables: SgmiiCtl::CDR_EN
                | SgmiiCtl::RX_FRONT_EN
                | SgmiiCtl::RX_SIGNAL_DETECT_EN
                | SgmiiCtl::TX_DRIVER_EN
                | SgmiiCtl::QSGMII_EN,
        })
    }

    /// Packs the parameters into the register layout
    pub fn bits(&self) -> u32 {
        self.enables.bits()
            | regs::QSGMII_PHY_TX_DRV_AMP.prep(self.tx_drv_amp)
            | regs::QSGMII_PHY_TX_SLEW.prep(self.tx_slew)
            | regs::QSGMII_PHY_DEEMPHASIS_LVL.prep(self.deemphasis_lvl)
            | regs::QSGMII_PHY_RX_DC_BIAS.prep(self.rx_dc_bias)
            | regs::QSGMII_PHY_PHASE_LOOP_GAIN.prep(self.phase_loop_gain)
            | regs::QSGMII_PHY_RX_INPUT_EQU.prep(self.rx_input_equ)
            | regs::QSGMII_PHY_CDR_PI_SLEW.prep(self.cdr_pi_slew)
    }
}

/// Builds the 4-bit PCS channel word.  With no fixed link the force bit is
/// left clear, which also undoes anything a bootloader may have forced.
pub fn pcs_ch_speed(fixed: Option<Speed>) -> PcsChCtl {
    match fixed {
        None => PcsChCtl::empty(),
        Some(Speed::Speed1G) => PcsChCtl::SPEED_FORCE | PcsChCtl::SPEED_1000,
        Some(Speed::Speed100M) => PcsChCtl::SPEED_FORCE | PcsChCtl::SPEED_100,
        Some(Speed::Speed10M) => PcsChCtl::SPEED_FORCE,
    }
}
