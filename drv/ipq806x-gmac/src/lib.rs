// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Glue between the IPQ806x NSS block and its four DWMAC Ethernet
//! controllers.
//!
//! The MACs themselves are driven by a generic core (see [stmmac]).  What's
//! specific to the IPQ806x is the clocking and pin muxing, which lives in two
//! shared syscon regions:
//!
//! - NSS common: per-GMAC clock dividers, clock gates, clock source and
//!   interface select.
//! - QSGMII CSR: the PCS and the SerDes analog settings for GMAC1-3 when
//!   they run SGMII.
//!
//! Register access goes through the [Regmap] trait, which callers must
//! implement.  A single [Ipq806xGmac] handles one controller; fields for
//! different controllers are disjoint, so instances can share the regmaps
//! but calls for one instance must not run concurrently.
#![cfg_attr(not(test), no_std)]

#[macro_use]
pub mod trace;

pub mod clock;
pub mod config;
pub mod qsgmii;
pub mod regs;
pub mod soc;
pub mod stmmac;

mod err;

use crate::config::{FixedLink, GmacConfig, GmacId, Iface};
use crate::qsgmii::SerdesParams;
use crate::regs::{GmacCtl, PcsChCtl};
use crate::soc::SiliconRevision;
use crate::stmmac::{
    CoreClock, PlatData, Platform, SetClkTxRate, StmmacCore,
};
use crate::trace::{Region, Ringbuf, Trace};

pub use config::{PhyInterfaceMode, Speed};
pub use err::GmacError;

/// This trait abstracts over the ways of reaching a syscon register region
/// (MMIO, a host regmap, a recording fake).  Offsets are in bytes from the
/// start of the region, and all accesses are 32 bits wide.
pub trait Regmap {
    fn read(&self, offset: u32) -> Result<u32, GmacError>;

    fn write(&self, offset: u32, value: u32) -> Result<(), GmacError>;

    /// Performs a read-modify-write, returning the value written
    fn modify<F>(&self, offset: u32, f: F) -> Result<u32, GmacError>
    where
        F: FnOnce(u32) -> u32,
    {
        let value = f(self.read(offset)?);
        self.write(offset, value)?;
        Ok(value)
    }

    /// Replaces the bits selected by `mask` with those of `value`, returning
    /// the value written.  Unlike some regmap implementations this always
    /// writes, even if nothing changed.
    fn update_bits(
        &self,
        offset: u32,
        mask: u32,
        value: u32,
    ) -> Result<u32, GmacError> {
        self.modify(offset, |v| (v & !mask) | (value & mask))
    }
}

impl<R: Regmap + ?Sized> Regmap for &R {
    fn read(&self, offset: u32) -> Result<u32, GmacError> {
        (**self).read(offset)
    }

    fn write(&self, offset: u32, value: u32) -> Result<(), GmacError> {
        (**self).write(offset, value)
    }
}

pub const TRACE_DEPTH: usize = 16;

/// Inter-frame gap programmed into `GMAC_CTL`, in bytes
const GMAC_IFG: u32 = 12;

/// Handle for one GMAC's slice of the NSS and QSGMII registers.
pub struct Ipq806xGmac<R, C> {
    id: GmacId,
    phy_mode: PhyInterfaceMode,
    nss_common: R,
    qsgmii_csr: Option<R>,
    /// Held for as long as the MAC is alive; only touched at probe
    _core_clk: C,
    trace: Ringbuf<Trace, TRACE_DEPTH>,
}

/// Everything the SGMII-only steps of bring-up need, resolved up front
struct SgmiiPlan {
    ctl_offset: u32,
    params: SerdesParams,
    pcs: PcsChCtl,
}

impl<R: Regmap, C: CoreClock> Ipq806xGmac<R, C> {
    pub fn new(
        id: GmacId,
        phy_mode: PhyInterfaceMode,
        nss_common: R,
        qsgmii_csr: Option<R>,
        core_clk: C,
    ) -> Self {
        Self {
            id,
            phy_mode,
            nss_common,
            qsgmii_csr,
            _core_clk: core_clk,
            trace: Ringbuf::new(Trace::None),
        }
    }

    /// Gathers the resources named by the device node.
    ///
    /// The `qcom,qsgmii-csr` region is only needed for SGMII.  If it's
    /// missing on an RGMII port, we note that in the trace buffer and carry
    /// on without it.
    pub fn of_parse<P>(
        cfg: &GmacConfig,
        platform: &mut P,
    ) -> Result<Self, GmacError>
    where
        P: Platform<Regmap = R, Clock = C>,
    {
        let id = cfg.gmac_id()?;

        let mut core_clk = platform
            .clock(stmmac::CORE_CLK_NAME)
            .map_err(|_| GmacError::MissingCoreClock)?;
        let clk_rate = core_clk.set_rate(stmmac::CORE_CLK_RATE);

        let nss_common = platform
            .syscon_regmap(stmmac::NSS_COMMON_PHANDLE)
            .map_err(|_| GmacError::MissingNssCommon)?;

        let qsgmii_csr =
            match platform.syscon_regmap(stmmac::QSGMII_CSR_PHANDLE) {
                Ok(r) => Some(r),
                Err(_) if cfg.phy_mode.iface() == Some(Iface::Sgmii) => {
                    return Err(GmacError::MissingQsgmiiCsr);
                }
                Err(_) => None,
            };

        let mut gmac =
            Self::new(id, cfg.phy_mode, nss_common, qsgmii_csr, core_clk);
        if clk_rate.is_err() {
            trace_entry!(
                gmac.trace,
                Trace::CoreClkRateFailed(stmmac::CORE_CLK_RATE)
            );
        }
        if gmac.qsgmii_csr.is_none() {
            trace_entry!(gmac.trace, Trace::QsgmiiCsrMissing);
        }
        Ok(gmac)
    }

    /// Full attach sequence: parse the node, bring up the clocking, then
    /// hand the MAC to the generic core with `self` as its speed hook.
    pub fn probe<P, S>(
        cfg: &GmacConfig,
        platform: &mut P,
        core: &mut S,
    ) -> Result<(), GmacError>
    where
        P: Platform<Regmap = R, Clock = C>,
        S: StmmacCore<Self>,
    {
        let mut gmac = Self::of_parse(cfg, platform)?;
        let rev = SiliconRevision::detect(&platform.soc_info());
        gmac.init(rev, cfg.fixed_link.as_ref())?;

        trace_entry!(
            gmac.trace,
            Trace::Probed {
                id: gmac.id.index(),
                mode: gmac.phy_mode,
            }
        );
        let plat = PlatData::new(gmac.phy_mode);
        core.dvr_probe(plat, gmac)
    }

    pub fn id(&self) -> GmacId {
        self.id
    }

    pub fn phy_mode(&self) -> PhyInterfaceMode {
        self.phy_mode
    }

    pub fn trace(&self) -> &Ringbuf<Trace, TRACE_DEPTH> {
        &self.trace
    }

    /// One-time hardware bring-up, run before the MAC core starts.
    ///
    /// Everything that can be rejected (the mode, GMAC0 in SGMII, the
    /// fixed-link speed, a missing QSGMII CSR) is checked before the first
    /// register write, so a failed bring-up leaves the hardware alone.
    pub fn init(
        &mut self,
        rev: SiliconRevision,
        fixed_link: Option<&FixedLink>,
    ) -> Result<(), GmacError> {
        let iface = self.iface()?;
        let sgmii = match iface {
            Iface::Sgmii => Some(self.sgmii_plan(rev, fixed_link)?),
            Iface::Rgmii => None,
        };

        if sgmii.is_some() {
            self.csr_write(
                regs::QSGMII_PCS_CAL_LCKDT_CTL,
                regs::QSGMII_PCS_CAL_LCKDT_CTL_RST,
            )?;
        }

        // Inter frame gap is set to 12, and we also initiate an AXI low
        // power exit request
        let mut ctl = GmacCtl::from_bits_retain(
            GMAC_IFG << regs::GMAC_CTL_IFG_SHIFT
                | GMAC_IFG << regs::GMAC_CTL_IFG_LIMIT_SHIFT,
        ) | GmacCtl::CSYS_REQ;
        ctl.set(GmacCtl::PHY_IFACE_SEL, iface == Iface::Rgmii);
        self.nss_write(regs::gmac_ctl(self.id), ctl.bits())?;

        let shift = regs::clk_src_ctrl_shift(self.id);
        let sel = regs::clk_src_ctrl_sel(self.id, iface);
        self.nss_modify(regs::NSS_COMMON_CLK_SRC_CTRL, |v| {
            (v & !(1 << shift)) | (sel << shift)
        })?;

        let gate = regs::clk_gate_ptp_en(self.id)
            | clock::clk_gate_bits(self.id, iface);
        self.nss_modify(regs::NSS_COMMON_CLK_GATE, |v| v | gate)?;

        if let Some(plan) = sgmii {
            self.csr_write(plan.ctl_offset, plan.params.bits())?;
            let shift = regs::pcs_ch_speed_shift(self.id);
            self.csr_update_bits(
                regs::QSGMII_PCS_ALL_CH_CTL,
                PcsChCtl::all().bits() << shift,
                plan.pcs.bits() << shift,
            )?;
        }
        Ok(())
    }

    /// Reprograms the RX/TX clock divider for a new link speed (in Mbps).
    ///
    /// The clocks are gated while the divider changes.  If `speed` isn't
    /// supported we bail out after gating, leaving the clocks off.
    pub fn set_speed(&mut self, speed: u32) -> Result<(), GmacError> {
        let iface = self.iface()?;
        let clk_bits = clock::clk_gate_bits(self.id, iface);
        trace_entry!(self.trace, Trace::SetSpeed(speed));

        // Disable the clocks
        self.nss_modify(regs::NSS_COMMON_CLK_GATE, |v| v & !clk_bits)?;

        let div = match clock::clk_div(self.phy_mode, speed) {
            Ok(div) => div,
            Err(e) => {
                trace_entry!(self.trace, Trace::UnsupportedSpeed(speed));
                return Err(e);
            }
        };

        // Set the divider
        let shift = regs::clk_div_shift(self.id);
        self.nss_modify(regs::NSS_COMMON_CLK_DIV0, |v| {
            (v & !(regs::NSS_COMMON_CLK_DIV_MASK << shift)) | (div << shift)
        })?;

        // Enable the clocks back
        self.nss_modify(regs::NSS_COMMON_CLK_GATE, |v| v | clk_bits)?;
        Ok(())
    }

    fn iface(&mut self) -> Result<Iface, GmacError> {
        self.phy_mode.supported_iface().inspect_err(|_| {
            trace_entry!(self.trace, Trace::UnsupportedMode(self.phy_mode));
        })
    }

    fn sgmii_plan(
        &mut self,
        rev: SiliconRevision,
        fixed_link: Option<&FixedLink>,
    ) -> Result<SgmiiPlan, GmacError> {
        let params = SerdesParams::new(self.id, rev).inspect_err(|_| {
            trace_entry!(
                self.trace,
                Trace::InvalidInstanceForMode(self.id.index())
            );
        })?;
        let ctl_offset = regs::qsgmii_phy_sgmii_ctl(self.id).ok_or(
            GmacError::InvalidInstanceForMode { id: self.id.index() },
        )?;
        if self.qsgmii_csr.is_none() {
            return Err(GmacError::MissingQsgmiiCsr);
        }
        let fixed = fixed_link.map(FixedLink::speed).transpose()?;
        Ok(SgmiiPlan {
            ctl_offset,
            params,
            pcs: qsgmii::pcs_ch_speed(fixed),
        })
    }

    fn nss_write(&mut self, offset: u32, value: u32) -> Result<(), GmacError> {
        self.nss_common.write(offset, value)?;
        self.trace_write(Region::NssCommon, offset, value);
        Ok(())
    }

    fn nss_modify<F>(&mut self, offset: u32, f: F) -> Result<(), GmacError>
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.nss_common.modify(offset, f)?;
        self.trace_write(Region::NssCommon, offset, value);
        Ok(())
    }

    fn csr(&self) -> Result<&R, GmacError> {
        self.qsgmii_csr.as_ref().ok_or(GmacError::MissingQsgmiiCsr)
    }

    fn csr_write(&mut self, offset: u32, value: u32) -> Result<(), GmacError> {
        self.csr()?.write(offset, value)?;
        self.trace_write(Region::QsgmiiCsr, offset, value);
        Ok(())
    }

    fn csr_update_bits(
        &mut self,
        offset: u32,
        mask: u32,
        value: u32,
    ) -> Result<(), GmacError> {
        let value = self.csr()?.update_bits(offset, mask, value)?;
        self.trace_write(Region::QsgmiiCsr, offset, value);
        Ok(())
    }

    fn trace_write(&mut self, region: Region, offset: u32, value: u32) {
        trace_entry!(
            self.trace,
            Trace::Write {
                region,
                offset,
                value
            }
        );
    }
}

impl<R: Regmap, C: CoreClock> SetClkTxRate for Ipq806xGmac<R, C> {
    /// The interface can't change after probe, so only `speed` matters
    fn set_clk_tx_rate(
        &mut self,
        _interface: PhyInterfaceMode,
        speed: u32,
    ) -> Result<(), GmacError> {
        self.set_speed(speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeRegs {
        mem: RefCell<Vec<(u32, u32)>>,
        writes: RefCell<Vec<(u32, u32)>>,
    }

    impl Regmap for FakeRegs {
        fn read(&self, offset: u32) -> Result<u32, GmacError> {
            Ok(self
                .mem
                .borrow()
                .iter()
                .rev()
                .find(|(o, _)| *o == offset)
                .map(|(_, v)| *v)
                .unwrap_or(0))
        }

        fn write(&self, offset: u32, value: u32) -> Result<(), GmacError> {
            self.mem.borrow_mut().push((offset, value));
            self.writes.borrow_mut().push((offset, value));
            Ok(())
        }
    }

    struct NoClock;
    impl CoreClock for NoClock {
        fn set_rate(&mut self, _hz: u32) -> Result<(), GmacError> {
            Ok(())
        }
    }

    fn gmac<'a>(
        id: u32,
        mode: PhyInterfaceMode,
        nss: &'a FakeRegs,
        csr: &'a FakeRegs,
    ) -> Ipq806xGmac<&'a FakeRegs, NoClock> {
        let id = GmacId::new(id).unwrap();
        Ipq806xGmac::new(id, mode, nss, Some(csr), NoClock)
    }

    #[test]
    fn update_bits_masks_value() {
        let regs = FakeRegs::default();
        regs.write(0x80, 0xffff_0000).unwrap();
        assert_eq!(regs.update_bits(0x80, 0xf0, 0x1a5), Ok(0xffff_00a0));
    }

    #[test]
    fn rgmii_1g_on_gmac2() {
        let (nss, csr) = (FakeRegs::default(), FakeRegs::default());
        let mut g = gmac(2, PhyInterfaceMode::Rgmii, &nss, &csr);
        g.set_speed(1000).unwrap();
        assert_eq!(
            *nss.writes.borrow(),
            [(0x8, 0), (0xc, 1 << 16), (0x8, 0b11 << 12)]
        );
        assert!(csr.writes.borrow().is_empty());
    }

    #[test]
    fn unsupported_mode_writes_nothing() {
        let (nss, csr) = (FakeRegs::default(), FakeRegs::default());
        let mut g = gmac(1, PhyInterfaceMode::Rmii, &nss, &csr);
        assert_eq!(
            g.set_speed(100),
            Err(GmacError::UnsupportedInterface(PhyInterfaceMode::Rmii))
        );
        assert_eq!(
            g.init(SiliconRevision::Other, None),
            Err(GmacError::UnsupportedInterface(PhyInterfaceMode::Rmii))
        );
        assert!(nss.writes.borrow().is_empty());
        assert!(csr.writes.borrow().is_empty());
        assert_eq!(
            g.trace().latest().map(|e| (e.payload, e.count)),
            Some((Trace::UnsupportedMode(PhyInterfaceMode::Rmii), 2))
        );
    }

    #[test]
    fn unsupported_speed_leaves_clocks_gated() {
        let (nss, csr) = (FakeRegs::default(), FakeRegs::default());
        nss.write(0x8, 0xffff).unwrap();
        nss.writes.borrow_mut().clear();

        let mut g = gmac(3, PhyInterfaceMode::Sgmii, &nss, &csr);
        assert_eq!(
            g.set_speed(2500),
            Err(GmacError::UnsupportedSpeed {
                mode: PhyInterfaceMode::Sgmii,
                speed: 2500
            })
        );
        assert_eq!(*nss.writes.borrow(), [(0x8, 0xffff & !0x88)]);
        assert_eq!(
            g.trace().latest().map(|e| e.payload),
            Some(Trace::UnsupportedSpeed(2500))
        );
    }

    #[test]
    fn divider_preserves_other_macs() {
        let (nss, csr) = (FakeRegs::default(), FakeRegs::default());
        nss.write(0xc, 0x6363_6363).unwrap();
        let mut g = gmac(1, PhyInterfaceMode::RgmiiId, &nss, &csr);
        g.set_speed(100).unwrap();
        assert_eq!(nss.read(0xc), Ok(0x6363_0963));
    }

    #[test]
    fn rgmii_bringup() {
        let (nss, csr) = (FakeRegs::default(), FakeRegs::default());
        let mut g = gmac(0, PhyInterfaceMode::RgmiiTxid, &nss, &csr);
        g.init(SiliconRevision::V1, None).unwrap();
        assert_eq!(
            *nss.writes.borrow(),
            [
                (0x30, 0x0009_0c0c),
                (0x14, 0x1),
                (0x8, (1 << 16) | 0b11 << 8),
            ]
        );
        assert!(csr.writes.borrow().is_empty());
    }

    #[test]
    fn sgmii_fixed_link_forces_pcs() {
        let (nss, csr) = (FakeRegs::default(), FakeRegs::default());
        csr.write(0x80, 0xffff_ffff).unwrap();
        csr.writes.borrow_mut().clear();

        let mut g = gmac(2, PhyInterfaceMode::Sgmii, &nss, &csr);
        let link = FixedLink {
            speed: Some(100),
            full_duplex: true,
        };
        g.init(SiliconRevision::Other, Some(&link)).unwrap();
        assert_eq!(
            *csr.writes.borrow(),
            [
                (0x120, 1 << 19),
                (0x13c, 0xc09c_408f),
                (0x80, 0xffff_f7ff),
            ]
        );
        assert_eq!(nss.read(0x14), Ok(1 << 2));
    }

    #[test]
    fn bad_fixed_link_writes_nothing() {
        let (nss, csr) = (FakeRegs::default(), FakeRegs::default());
        let mut g = gmac(3, PhyInterfaceMode::Sgmii, &nss, &csr);
        let link = FixedLink::default();
        assert_eq!(
            g.init(SiliconRevision::Other, Some(&link)),
            Err(GmacError::MissingFixedLinkSpeed)
        );
        assert!(nss.writes.borrow().is_empty());
        assert!(csr.writes.borrow().is_empty());
    }

    #[test]
    fn sgmii_needs_qsgmii_csr() {
        let nss = FakeRegs::default();
        let mut g: Ipq806xGmac<&FakeRegs, NoClock> = Ipq806xGmac::new(
            GmacId::new(1).unwrap(),
            PhyInterfaceMode::Sgmii,
            &nss,
            None,
            NoClock,
        );
        assert_eq!(
            g.init(SiliconRevision::Other, None),
            Err(GmacError::MissingQsgmiiCsr)
        );
        assert!(nss.writes.borrow().is_empty());
    }
}
