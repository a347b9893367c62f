//! Components: one physical drone part each.

use std::fmt;
use std::str::FromStr;

use cgmath::{Deg, Euler, Matrix4, Quaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// Closed set of part categories. Unknown strings deserialize to [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Frame,
    Motor,
    Prop,
    Battery,
    Camera,
    Stack,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Frame,
        Category::Motor,
        Category::Prop,
        Category::Battery,
        Category::Camera,
        Category::Stack,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Frame => "frame",
            Category::Motor => "motor",
            Category::Prop => "prop",
            Category::Battery => "battery",
            Category::Camera => "camera",
            Category::Stack => "stack",
            Category::Other => "other",
        }
    }

    /// Case-insensitive lookup. Plural and common aliases are accepted.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "frame" | "frames" => Category::Frame,
            "motor" | "motors" => Category::Motor,
            "prop" | "props" | "propeller" | "propellers" => Category::Prop,
            "battery" | "batteries" | "lipo" => Category::Battery,
            "camera" | "cameras" | "fpv camera" => Category::Camera,
            "stack" | "fc" | "esc" | "flight controller" => Category::Stack,
            _ => Category::Other,
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::parse(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Linear RGB display color, serialized as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [f32; 3]);

impl Color {
    pub const GRAY: Color = Color([0.6, 0.6, 0.6]);

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self([r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0)])
    }

    /// Parses `#rgb` or `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, BuildError> {
        let invalid = || BuildError::InvalidColor(hex.to_string());
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(invalid());
        }
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(invalid()),
        };

        let mut channels = [0.0; 3];
        for (i, channel) in channels.iter_mut().enumerate() {
            let byte = u8::from_str_radix(&expanded[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
            *channel = byte as f32 / 255.0;
        }
        Ok(Self(channels))
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// RGBA with the given alpha, ready for a material uniform
    pub fn with_alpha(self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.0;
        [r, g, b, alpha.clamp(0.0, 1.0)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::GRAY
    }
}

impl FromStr for Color {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = BuildError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_hex()
    }
}

/// Position, rotation (degrees per axis) and scale of a component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl Transform {
    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, x_deg: f32, y_deg: f32, z_deg: f32) -> Self {
        self.rotation = [x_deg, y_deg, z_deg];
        self
    }

    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = [x, y, z];
        self
    }

    pub fn translation(&self) -> Vector3<f32> {
        self.position.into()
    }

    /// Model matrix: translate * rotate(XYZ euler) * scale
    pub fn to_matrix(&self) -> Matrix4<f32> {
        let [rx, ry, rz] = self.rotation;
        let [sx, sy, sz] = self.scale;
        let rotation = Quaternion::from(Euler::new(Deg(rx), Deg(ry), Deg(rz)));

        Matrix4::from_translation(self.translation())
            * Matrix4::from(rotation)
            * Matrix4::from_nonuniform_scale(sx, sy, sz)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountingPoint {
    pub position: [f32; 3],
    #[serde(rename = "type")]
    pub kind: String,
}

/// Physical information for the host. Rendering does not consume it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentMetadata {
    /// Width, height, depth in millimetres
    pub dimensions: [f32; 3],
    /// Grams
    pub weight: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mounting_points: Vec<MountingPoint>,
}

fn default_opacity() -> f32 {
    1.0
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Category,
    /// External asset locator. `None` always renders placeholder geometry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_ref: Option<String>,
    #[serde(default)]
    pub transform: Transform,
    /// Only used for placeholder geometry
    #[serde(default)]
    pub color: Color,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub metadata: ComponentMetadata,
}

impl Component {
    pub fn new(id: impl Into<String>, category: Category) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            category,
            model_ref: None,
            transform: Transform::default(),
            color: Color::default(),
            opacity: 1.0,
            visible: true,
            metadata: ComponentMetadata::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_model_ref(mut self, model_ref: impl Into<String>) -> Self {
        self.model_ref = Some(model_ref.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}
