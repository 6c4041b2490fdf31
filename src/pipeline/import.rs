//! CSV import: `mac,ipaddr,hostname[,description]` rows into DHCP scopes.

use anyhow::{Context, Result};
use csv::{ByteRecord, StringRecord};
use std::io::Read;
use std::net::Ipv4Addr;
use std::str::FromStr;
use tracing::{info, warn};

use crate::config::ConfigTree;
use crate::errors::SkipReason;
use crate::subnet::{find_interface_for_ip, is_ip_in_range};
use crate::unique::find_collision;
use crate::validate::{normalize_mac, validate_ip, validate_mac};
use crate::{
    AddedMapping, ImportOptions, ImportReport, InterfaceScope, ScopeResolution, SkippedRow,
    StaticMapError, StaticMapping, UniquenessScope,
};

pub const COMMIT_MESSAGE: &str = "Added DHCP static mappings from CSV";

/// Read every row after the header and append the acceptable ones to `tree`.
///
/// Rejected rows are recorded in the report and never stop the import.
/// Only I/O failures and an unknown fixed interface are errors.
pub fn import_csv<R: Read>(
    tree: &mut ConfigTree,
    reader: R,
    options: &ImportOptions,
) -> Result<ImportReport> {
    if let ScopeResolution::Fixed(iface) = &options.resolution {
        if tree.scope(iface).is_none() {
            return Err(StaticMapError::UnknownInterface(iface.clone()).into());
        }
    }

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut report = ImportReport::default();
    let mut record = ByteRecord::new();

    loop {
        // Bytes first so an undecodable row still reports its own line
        let (line, outcome) = match csv_reader.read_byte_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                let outcome = match StringRecord::from_byte_record(record.clone()) {
                    Ok(fields) => import_row(tree, &fields, options),
                    Err(e) => Err(SkipReason::Malformed(e.to_string())),
                };
                (line, outcome)
            }
            Err(e) => {
                if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                    return Err(e).context("Failed to read CSV input");
                }
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                (line, Err(SkipReason::Malformed(e.to_string())))
            }
        };

        match outcome {
            Ok(added) => {
                info!(
                    "Added: {} for MAC {} on interface {}",
                    added.mapping.ipaddr, added.mapping.mac, added.iface
                );
                report.added.push(added);
            }
            Err(reason) => {
                warn!(line, "Skipping: {}", reason);
                report.skipped.push(SkippedRow { line, reason });
            }
        }
    }

    Ok(report)
}

fn import_row(
    tree: &mut ConfigTree,
    record: &StringRecord,
    options: &ImportOptions,
) -> Result<AddedMapping, SkipReason> {
    if record.len() < 3 {
        return Err(SkipReason::TooFewColumns {
            found: record.len(),
            raw: record.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mac = record[0].trim();
    let ipaddr = record[1].trim();
    let hostname = record[2].trim();
    let descr = record.get(3).map(str::trim).unwrap_or("");

    if !validate_ip(ipaddr) || !validate_mac(mac) {
        return Err(SkipReason::InvalidAddress {
            mac: mac.to_string(),
            ip: ipaddr.to_string(),
        });
    }

    let index = resolve_scope(tree.scopes(), ipaddr, &options.resolution)?;
    let mut candidate = StaticMapping::new(mac, ipaddr, hostname, descr);

    let collision = match options.uniqueness {
        UniquenessScope::Interface => {
            find_collision(&candidate, &tree.scopes()[index].static_maps)
        }
        UniquenessScope::Global => find_collision(&candidate, tree.all_mappings()),
    };
    if let Some(reason) = collision {
        return Err(reason);
    }

    let scope = &tree.scopes()[index];
    if options.resolution == ScopeResolution::BySubnet && !options.allow_in_range {
        if let Some(pool) = &scope.pool {
            let (from, to) = (pool.from.to_string(), pool.to.to_string());
            if is_ip_in_range(ipaddr, &from, &to) {
                return Err(SkipReason::InPool {
                    ip: ipaddr.to_string(),
                    from,
                    to,
                });
            }
        }
    }

    candidate.mac = normalize_mac(mac);
    let scope = &mut tree.scopes_mut()[index];
    scope.static_maps.push(candidate.clone());

    Ok(AddedMapping {
        iface: scope.iface.clone(),
        mapping: candidate,
    })
}

/// Index of the scope a row belongs to
fn resolve_scope(
    scopes: &[InterfaceScope],
    ipaddr: &str,
    resolution: &ScopeResolution,
) -> Result<usize, SkipReason> {
    match resolution {
        ScopeResolution::BySubnet => {
            let iface = find_interface_for_ip(ipaddr, scopes)
                .ok_or_else(|| SkipReason::NoMatchingInterface(ipaddr.to_string()))?;
            scopes
                .iter()
                .position(|s| s.iface == iface)
                .ok_or_else(|| SkipReason::NoMatchingInterface(ipaddr.to_string()))
        }
        ScopeResolution::Fixed(iface) => {
            let index = scopes
                .iter()
                .position(|s| s.iface.eq_ignore_ascii_case(iface))
                .ok_or_else(|| SkipReason::NoMatchingInterface(ipaddr.to_string()))?;

            // The fixed scope still has to contain the address when its subnet is known
            if let Some(net) = scopes[index].subnet {
                let inside = Ipv4Addr::from_str(ipaddr)
                    .map(|ip| net.contains(&ip))
                    .unwrap_or(false);
                if !inside {
                    return Err(SkipReason::OutsideSubnet {
                        ip: ipaddr.to_string(),
                        iface: scopes[index].iface.clone(),
                        cidr: net.to_string(),
                    });
                }
            }
            Ok(index)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const XML: &str = r#"<?xml version="1.0"?>
<pfsense>
  <interfaces>
    <lan>
      <ipaddr>192.168.1.1</ipaddr>
      <subnet>24</subnet>
    </lan>
    <opt1>
      <ipaddr>10.0.0.1</ipaddr>
      <subnet>24</subnet>
    </opt1>
  </interfaces>
  <dhcpd>
    <lan>
      <range>
        <from>192.168.1.100</from>
        <to>192.168.1.199</to>
      </range>
    </lan>
    <opt1>
      <staticmap>
        <mac>00:11:22:33:44:55</mac>
        <ipaddr>10.0.0.10</ipaddr>
        <hostname>nas</hostname>
      </staticmap>
    </opt1>
  </dhcpd>
</pfsense>
"#;

    fn tree() -> ConfigTree {
        ConfigTree::parse(Cursor::new(XML)).unwrap()
    }

    fn run(tree: &mut ConfigTree, csv: &str, options: &ImportOptions) -> ImportReport {
        import_csv(tree, Cursor::new(csv), options).unwrap()
    }

    #[test]
    fn test_header_is_discarded_unvalidated() {
        let mut tree = tree();
        let csv = "whatever,header,we,like,here\naa:bb:cc:dd:ee:01,192.168.1.10,pc1,desk\n";
        let report = run(&mut tree, csv, &ImportOptions::default());
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.skip_count(), 0);
    }

    #[test]
    fn test_rows_go_to_matching_interface() {
        let mut tree = tree();
        let csv = "mac,ipaddr,hostname,description\n\
                   AA:BB:CC:DD:EE:01,192.168.1.10,pc1,desk\n\
                   aa:bb:cc:dd:ee:02,10.0.0.20,cam1\n";
        let report = run(&mut tree, csv, &ImportOptions::default());

        assert_eq!(report.success_count(), 2);
        assert_eq!(report.added[0].iface, "lan");
        assert_eq!(report.added[1].iface, "opt1");

        let lan = tree.scope("lan").unwrap();
        assert_eq!(lan.static_maps[0].mac, "aa:bb:cc:dd:ee:01");
        assert_eq!(lan.static_maps[0].descr(), Some("desk"));
        assert_eq!(tree.scope("opt1").unwrap().static_maps[1].descr(), None);
    }

    #[test]
    fn test_rejections_are_counted_not_fatal() {
        let mut tree = tree();
        let csv = "mac,ipaddr,hostname\n\
                   aa:bb:cc:dd:ee:01,192.168.1.10\n\
                   not-a-mac,192.168.1.11,pc2\n\
                   aa:bb:cc:dd:ee:03,192.168.1.300,pc3\n\
                   aa:bb:cc:dd:ee:04,172.16.0.4,pc4\n\
                   aa:bb:cc:dd:ee:05,10.0.0.10,pc5\n\
                   00:11:22:33:44:55,10.0.0.11,pc6\n\
                   aa:bb:cc:dd:ee:07,10.0.0.12,NAS\n\
                   aa:bb:cc:dd:ee:08,192.168.1.150,pc8\n\
                   aa:bb:cc:dd:ee:09,192.168.1.20,pc9\n";
        let report = run(&mut tree, csv, &ImportOptions::default());

        let reasons: Vec<_> = report.skipped.iter().map(|s| s.reason.clone()).collect();
        assert!(matches!(
            reasons[0],
            SkipReason::TooFewColumns { found: 2, .. }
        ));
        assert!(matches!(reasons[1], SkipReason::InvalidAddress { .. }));
        assert!(matches!(reasons[2], SkipReason::InvalidAddress { .. }));
        assert_eq!(
            reasons[3],
            SkipReason::NoMatchingInterface("172.16.0.4".into())
        );
        assert_eq!(reasons[4], SkipReason::DuplicateIp("10.0.0.10".into()));
        assert_eq!(
            reasons[5],
            SkipReason::DuplicateMac("00:11:22:33:44:55".into())
        );
        assert_eq!(reasons[6], SkipReason::DuplicateHostname("NAS".into()));
        assert!(matches!(reasons[7], SkipReason::InPool { .. }));

        assert_eq!(report.skip_count(), 8);
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.skipped[0].line, 2);
    }

    #[test]
    fn test_allow_in_range() {
        let mut tree = tree();
        let csv = "h\naa:bb:cc:dd:ee:08,192.168.1.150,pc8\n";
        let options = ImportOptions {
            allow_in_range: true,
            ..Default::default()
        };
        let report = run(&mut tree, csv, &options);
        assert_eq!(report.success_count(), 1);
    }

    #[test]
    fn test_rows_in_same_batch_collide() {
        let mut tree = tree();
        let csv = "h\n\
                   AA:BB:CC:DD:EE:FF,192.168.1.50,printer1,office printer\n\
                   AA:BB:CC:DD:EE:FF,192.168.1.51,printer2,\n";
        let report = run(&mut tree, csv, &ImportOptions::default());
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.skip_count(), 1);
        assert_eq!(
            report.skipped[0].reason,
            SkipReason::DuplicateMac("AA:BB:CC:DD:EE:FF".into())
        );
    }

    #[test]
    fn test_uniqueness_per_interface_vs_global() {
        // Same MAC as the opt1 reservation, but destined for lan
        let csv = "h\n00:11:22:33:44:55,192.168.1.60,other\n";

        let mut per_iface = tree();
        let report = run(&mut per_iface, csv, &ImportOptions::default());
        assert_eq!(report.success_count(), 1);

        let mut global = tree();
        let options = ImportOptions {
            uniqueness: UniquenessScope::Global,
            ..Default::default()
        };
        let report = run(&mut global, csv, &options);
        assert_eq!(report.success_count(), 0);
        assert_eq!(
            report.skipped[0].reason,
            SkipReason::DuplicateMac("00:11:22:33:44:55".into())
        );
    }

    #[test]
    fn test_fixed_interface_skips_pool_but_checks_subnet() {
        let mut tree = tree();
        let csv = "h\n\
                   aa:bb:cc:dd:ee:08,192.168.1.150,pc8\n\
                   aa:bb:cc:dd:ee:09,10.0.0.99,pc9\n";
        let options = ImportOptions {
            resolution: ScopeResolution::Fixed("lan".into()),
            ..Default::default()
        };
        let report = run(&mut tree, csv, &options);

        assert_eq!(report.success_count(), 1);
        assert_eq!(report.added[0].iface, "lan");
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::OutsideSubnet { .. }
        ));
    }

    #[test]
    fn test_fixed_interface_must_exist() {
        let mut tree = tree();
        let options = ImportOptions {
            resolution: ScopeResolution::Fixed("opt9".into()),
            ..Default::default()
        };
        let err = import_csv(&mut tree, Cursor::new("h\n"), &options).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StaticMapError>(),
            Some(StaticMapError::UnknownInterface(_))
        ));
    }

    #[test]
    fn test_quoted_fields_and_blank_lines() {
        let mut tree = tree();
        let csv = "h\n\naa:bb:cc:dd:ee:01,192.168.1.10,pc1,\"Desk, 2nd floor\"\n\n";
        let report = run(&mut tree, csv, &ImportOptions::default());
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.skip_count(), 0);
        assert_eq!(
            tree.scope("lan").unwrap().static_maps[0].descr(),
            Some("Desk, 2nd floor")
        );
    }

    #[test]
    fn test_undecodable_row_reports_its_own_line() {
        let mut tree = tree();
        let csv: &[u8] = b"mac,ipaddr,hostname\n\
                           aa:bb:cc:dd:ee:01,192.168.1.10,pc1\n\
                           aa:bb:cc:dd:ee:02,192.168.1.11,p\xff\n\
                           aa:bb:cc:dd:ee:03,192.168.1.12,pc3\n";
        let options = ImportOptions::default();
        let report = import_csv(&mut tree, Cursor::new(csv), &options).unwrap();

        assert_eq!(report.success_count(), 2);
        assert_eq!(report.skip_count(), 1);
        let skipped = &report.skipped[0];
        assert_eq!(skipped.line, 3);
        assert!(matches!(skipped.reason, SkipReason::Malformed(_)));

        let lan = tree.scope("lan").unwrap();
        assert_eq!(lan.static_maps[1].ipaddr, "192.168.1.12");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let mut tree = tree();
        let csv = "h\n aa:bb:cc:dd:ee:01 , 192.168.1.10 , pc1 , desk \n";
        let report = run(&mut tree, csv, &ImportOptions::default());
        assert_eq!(report.success_count(), 1);
        let mapping = &tree.scope("lan").unwrap().static_maps[0];
        assert_eq!(mapping.ipaddr, "192.168.1.10");
        assert_eq!(mapping.hostname(), Some("pc1"));
    }
}
