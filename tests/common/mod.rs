#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_XML: &str = r#"<?xml version="1.0"?>
<pfsense>
  <version>23.3</version>
  <interfaces>
    <wan>
      <if>em0</if>
      <ipaddr>dhcp</ipaddr>
    </wan>
    <lan>
      <if>em1</if>
      <ipaddr>192.168.1.1</ipaddr>
      <subnet>24</subnet>
    </lan>
    <opt1>
      <if>em1.20</if>
      <ipaddr>10.20.0.1</ipaddr>
      <subnet>24</subnet>
    </opt1>
  </interfaces>
  <dhcpd>
    <lan>
      <enable/>
      <range>
        <from>192.168.1.100</from>
        <to>192.168.1.199</to>
      </range>
    </lan>
    <opt1>
      <enable/>
      <staticmap>
        <mac>00:11:22:33:44:55</mac>
        <cid>cam-01</cid>
        <ipaddr>10.20.0.10</ipaddr>
        <hostname>camera1</hostname>
        <descr>front door</descr>
      </staticmap>
    </opt1>
  </dhcpd>
</pfsense>
"#;

/// `lan` scoped to 192.168.1.0/24 with no pool and no reservations
pub const LAN_ONLY_XML: &str = r#"<?xml version="1.0"?>
<pfsense>
  <interfaces>
    <lan>
      <ipaddr>192.168.1.1</ipaddr>
      <subnet>24</subnet>
    </lan>
  </interfaces>
  <dhcpd>
    <lan>
      <enable/>
    </lan>
  </dhcpd>
</pfsense>
"#;

pub const PRINTER_CSV: &str = "mac,ipaddr,hostname,description\n\
AA:BB:CC:DD:EE:FF,192.168.1.50,printer1,office printer\n\
AA:BB:CC:DD:EE:FF,192.168.1.51,printer2,\n";

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}
