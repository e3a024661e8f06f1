use cgmath::{Matrix4, Vector3};

/// What a locator marks. Unknown values are kept as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocatorKind {
    Event,
    Script,
    Generic,
    CarStart,
    Spline,
    DynamicZone,
    Occlusion,
    InteriorEntrance,
    Directional,
    Action,
    Fov,
    BreakableCamera,
    StaticCamera,
    PedGroup,
    Coin,
    SpawnPoint,
    Other(u32),
}

impl From<u32> for LocatorKind {
    fn from(raw: u32) -> Self {
        match raw {
            0 => LocatorKind::Event,
            1 => LocatorKind::Script,
            2 => LocatorKind::Generic,
            3 => LocatorKind::CarStart,
            4 => LocatorKind::Spline,
            5 => LocatorKind::DynamicZone,
            6 => LocatorKind::Occlusion,
            7 => LocatorKind::InteriorEntrance,
            8 => LocatorKind::Directional,
            9 => LocatorKind::Action,
            10 => LocatorKind::Fov,
            11 => LocatorKind::BreakableCamera,
            12 => LocatorKind::StaticCamera,
            13 => LocatorKind::PedGroup,
            14 => LocatorKind::Coin,
            15 => LocatorKind::SpawnPoint,
            other => LocatorKind::Other(other),
        }
    }
}

/// A box or sphere that fires the locator's event when entered.
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerVolume {
    pub name: String,
    /// 0 = sphere, 1 = box
    pub kind: u32,
    pub half_extents: Vector3<f32>,
    pub transform: Matrix4<f32>,
}

/// A named placement marker with no geometry of its own.
#[derive(Clone, Debug, PartialEq)]
pub struct Locator {
    pub name: String,
    pub kind: LocatorKind,
    /// Kind specific payload, left uninterpreted.
    pub data: Vec<u32>,
    pub position: Vector3<f32>,
    pub triggers: Vec<TriggerVolume>,
}
