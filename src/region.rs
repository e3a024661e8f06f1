//! Region streaming commands.
//!
//! Trigger volumes carry a command string naming the files to stream in and out,
//! e.g. `"l1r1.p3d;l1r2.p3d:l1i01.p3d@"`. Each file name is terminated by a
//! separator that says what to do with it:
//!
//! | separator | meaning         |
//! |-----------|-----------------|
//! | `;`       | load region     |
//! | `:`       | unload region   |
//! | `@`       | load interior   |
//! | `$`       | unload interior |
//!
//! Text after the last separator has no command and is ignored, as are empty names.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionCommands {
    pub region_loads: Vec<String>,
    pub region_unloads: Vec<String>,
    pub interior_loads: Vec<String>,
    pub interior_unloads: Vec<String>,
}

impl RegionCommands {
    pub fn is_empty(&self) -> bool {
        self.region_loads.is_empty()
            && self.region_unloads.is_empty()
            && self.interior_loads.is_empty()
            && self.interior_unloads.is_empty()
    }
}

pub fn parse_dyna_load(data: &str) -> RegionCommands {
    let mut commands = RegionCommands::default();
    let mut rest = data;
    while let Some(pos) = rest.find([';', ':', '@', '$']) {
        let name = &rest[..pos];
        let list = match rest.as_bytes()[pos] {
            b';' => &mut commands.region_loads,
            b':' => &mut commands.region_unloads,
            b'@' => &mut commands.interior_loads,
            _ => &mut commands.interior_unloads,
        };
        if !name.is_empty() {
            list.push(name.to_string());
        }
        rest = &rest[pos + 1..];
    }
    if !rest.is_empty() {
        log::debug!("Ignoring trailing region data {rest:?}");
    }
    commands
}
