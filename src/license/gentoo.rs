//! SPDX identifier translation and ebuild `LICENSE` syntax rendering.
//!
//! Gentoo has its own license directory; the table below covers the SPDX
//! identifiers that actually occur across crates.io. An identifier with
//! no mapping is a hard error so the operator notices instead of shipping
//! a wrong LICENSE value.

use crate::license::{LicenseError, LicenseExpr};

/// Gentoo license name for an SPDX requirement, including the `WITH`
/// exception pairs Gentoo has dedicated identifiers for.
pub fn gentoo_license(identifier: &str) -> Option<&'static str> {
    Some(match identifier {
        "0BSD" => "0BSD",
        "AGPL-3.0" | "AGPL-3.0-only" => "AGPL-3",
        "AGPL-3.0-or-later" => "AGPL-3+",
        "Apache-1.1" => "Apache-1.1",
        "Apache-2.0" => "Apache-2.0",
        "Apache-2.0 WITH LLVM-exception" => "Apache-2.0-with-LLVM-exceptions",
        "Artistic-2.0" => "Artistic-2",
        "BSD-2-Clause" => "BSD-2",
        "BSD-3-Clause" => "BSD",
        "BSL-1.0" => "Boost-1.0",
        "CC-BY-3.0" => "CC-BY-3.0",
        "CC-BY-4.0" => "CC-BY-4.0",
        "CC0-1.0" => "CC0-1.0",
        "CDDL-1.0" => "CDDL",
        "GPL-2.0" | "GPL-2.0-only" => "GPL-2",
        "GPL-2.0-or-later" => "GPL-2+",
        "GPL-3.0" | "GPL-3.0-only" => "GPL-3",
        "GPL-3.0-or-later" => "GPL-3+",
        "ISC" => "ISC",
        "LGPL-2.1" | "LGPL-2.1-only" => "LGPL-2.1",
        "LGPL-2.1-or-later" => "LGPL-2.1+",
        "LGPL-3.0" | "LGPL-3.0-only" => "LGPL-3",
        "LGPL-3.0-or-later" => "LGPL-3+",
        "MIT" => "MIT",
        "MIT-0" => "MIT",
        "MPL-1.1" => "MPL-1.1",
        "MPL-2.0" => "MPL-2.0",
        "OFL-1.1" => "OFL-1.1",
        "OpenSSL" => "openssl",
        "Unicode-3.0" => "Unicode-3.0",
        "Unicode-DFS-2016" => "Unicode-DFS-2016",
        "Unlicense" => "Unlicense",
        "WTFPL" => "WTFPL-2",
        "Zlib" => "ZLIB",
        "zlib-acknowledgement" => "ZLIB-with-acknowledgement",
        _ => return None,
    })
}

/// Render an expression in ebuild LICENSE syntax: AND is a space-joined
/// list, OR becomes `|| ( ... )`, and an AND nested inside an OR is
/// parenthesized.
pub fn to_ebuild(expr: &LicenseExpr) -> Result<String, LicenseError> {
    render(expr, false)
}

fn render(expr: &LicenseExpr, in_or: bool) -> Result<String, LicenseError> {
    match expr {
        LicenseExpr::License(identifier) => gentoo_license(identifier)
            .map(str::to_string)
            .ok_or_else(|| LicenseError::UnknownLicense(identifier.clone())),
        LicenseExpr::And(children) => {
            let parts = children
                .iter()
                .map(|c| render(c, false))
                .collect::<Result<Vec<_>, _>>()?;
            let joined = parts.join(" ");
            Ok(if in_or { format!("( {} )", joined) } else { joined })
        }
        LicenseExpr::Or(children) => {
            let parts = children
                .iter()
                .map(|c| render(c, true))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("|| ( {} )", parts.join(" ")))
        }
    }
}
