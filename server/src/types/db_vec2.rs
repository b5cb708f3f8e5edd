/// A 2D input axis pair.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, Default, PartialEq)]
pub struct DbVec2 {
    pub x: f32,
    pub y: f32,
}

impl DbVec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<DbVec2> for nalgebra::Vector2<f32> {
    fn from(v: DbVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<nalgebra::Vector2<f32>> for DbVec2 {
    fn from(v: nalgebra::Vector2<f32>) -> Self {
        Self::new(v.x, v.y)
    }
}
