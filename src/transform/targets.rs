//! Browser tier → lightningcss targets

use lightningcss::targets::{Browsers, Features, Targets};

use crate::config::BrowserTargets;

// lightningcss packs versions as major << 16 | minor << 8 | patch
fn version(major: Option<u32>) -> Option<u32> {
    major.map(|m| m << 16)
}

#[must_use]
pub fn browsers(targets: &BrowserTargets) -> Browsers {
    Browsers {
        android: version(targets.android),
        chrome: version(targets.chrome),
        edge: version(targets.edge),
        firefox: version(targets.firefox),
        ie: version(targets.ie),
        ios_saf: version(targets.ios_saf),
        opera: version(targets.opera),
        safari: version(targets.safari),
        samsung: version(targets.samsung),
    }
}

/// Targets with syntax lowering enabled and vendor prefixing disabled
#[must_use]
pub fn lowering_targets(targets: &BrowserTargets) -> Targets {
    Targets {
        browsers: Some(browsers(targets)),
        include: Features::empty(),
        exclude: Features::VendorPrefixes,
    }
}

/// Targets with every compatibility feature enabled, prefixes included
#[must_use]
pub fn full_targets(targets: &BrowserTargets) -> Targets {
    Targets {
        browsers: Some(browsers(targets)),
        include: Features::empty(),
        exclude: Features::empty(),
    }
}
