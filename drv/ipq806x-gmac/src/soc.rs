// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SoC identification, used to pick SerDes tuning that changed between
//! silicon revisions.

/// Identification strings the platform reports for the running SoC.  Any of
/// them may be unknown.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SocInfo<'a> {
    pub family: Option<&'a str>,
    pub soc_id: Option<&'a str>,
    pub revision: Option<&'a str>,
}

/// One row of a match table.  Every attribute that is `Some` must match the
/// corresponding [SocInfo] string as a glob pattern (`*` and `?`); `None`
/// matches anything.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SocMatch {
    pub family: Option<&'static str>,
    pub soc_id: Option<&'static str>,
    pub revision: Option<&'static str>,
}

/// First silicon revision of the IPQ806x
pub const GMAC_SOC_V1: &[SocMatch] = &[SocMatch {
    family: None,
    soc_id: None,
    revision: Some("1.*"),
}];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SiliconRevision {
    V1,
    Other,
}

impl SiliconRevision {
    pub fn detect(soc: &SocInfo<'_>) -> Self {
        if soc_match(GMAC_SOC_V1, soc).is_some() {
            SiliconRevision::V1
        } else {
            SiliconRevision::Other
        }
    }
}

/// Returns the first table row matching `soc`.  Rows with no attributes at
/// all never match.
pub fn soc_match<'t>(
    table: &'t [SocMatch],
    soc: &SocInfo<'_>,
) -> Option<&'t SocMatch> {
    fn attr(pat: Option<&str>, val: Option<&str>) -> bool {
        match (pat, val) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(p), Some(v)) => glob_match(p.as_bytes(), v.as_bytes()),
        }
    }
    table.iter().find(|m| {
        (m.family.is_some() || m.soc_id.is_some() || m.revision.is_some())
            && attr(m.family, soc.family)
            && attr(m.soc_id, soc.soc_id)
            && attr(m.revision, soc.revision)
    })
}

/// Shell-style matching with `*` and `?`.  Only the most recent `*` is
/// remembered, which is enough since a later star can always absorb what an
/// earlier one would have.
fn glob_match(pat: &[u8], s: &[u8]) -> bool {
    let (mut p, mut i) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while i < s.len() {
        match pat.get(p) {
            Some(b'*') => {
                star = Some((p, i));
                p += 1;
            }
            Some(&c) if c == b'?' || c == s[i] => {
                p += 1;
                i += 1;
            }
            _ => match star {
                Some((sp, si)) => {
                    p = sp + 1;
                    i = si + 1;
                    star = Some((sp, si + 1));
                }
                None => return false,
            },
        }
    }
    pat[p..].iter().all(|&c| c == b'*')
}
