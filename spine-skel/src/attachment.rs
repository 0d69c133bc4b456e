use crate::AttachmentKind;

/// Placement of an attachment's image inside its texture page, in normalized and pixel units.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TextureRegion {
    pub page: Option<usize>,
    pub u: f32,
    pub v: f32,
    pub u2: f32,
    pub v2: f32,
    pub degrees: u16,
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
    pub original_width: f32,
    pub original_height: f32,
}

impl Default for TextureRegion {
    /// The whole unit texture, unrotated and untrimmed.
    fn default() -> Self {
        Self {
            page: None,
            u: 0.0,
            v: 0.0,
            u2: 1.0,
            v2: 1.0,
            degrees: 0,
            offset_x: 0.0,
            offset_y: 0.0,
            width: 1.0,
            height: 1.0,
            original_width: 1.0,
            original_height: 1.0,
        }
    }
}

impl TextureRegion {
    pub fn rotate(&self) -> bool {
        self.degrees == 90
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VertexWeight {
    pub bone: usize,
    pub x: f32,
    pub y: f32,
    pub weight: f32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MeshVertices {
    Unweighted(Vec<[f32; 2]>),
    /// One list of bone influences per vertex.
    Weighted(Vec<Vec<VertexWeight>>),
}

impl Default for MeshVertices {
    fn default() -> Self {
        Self::Unweighted(Vec::new())
    }
}

impl MeshVertices {
    pub fn is_weighted(&self) -> bool {
        matches!(self, Self::Weighted(_))
    }

    pub fn vertex_count(&self) -> usize {
        match self {
            Self::Unweighted(v) => v.len(),
            Self::Weighted(v) => v.len(),
        }
    }
}

/// Identifies an attachment stored in [`crate::SkeletonData::skins`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AttachmentRef {
    pub skin: usize,
    pub slot_index: usize,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VertexData {
    pub vertices: MeshVertices,
    pub world_vertices_length: usize,
    /// Attachment whose deform timelines drive this one. Normally the attachment itself; a linked
    /// mesh that inherits deformation points at its parent.
    pub deform_attachment: Option<AttachmentRef>,
}

impl VertexData {
    /// Number of floats in one deform keyframe for this attachment.
    pub fn deform_length(&self) -> usize {
        match &self.vertices {
            MeshVertices::Unweighted(_) => self.world_vertices_length,
            MeshVertices::Weighted(vertices) => 2 * vertices.iter().map(Vec::len).sum::<usize>(),
        }
    }

    /// Flattened setup positions for unweighted vertices; `None` when weighted.
    pub fn setup_deform(&self) -> Option<Vec<f32>> {
        match &self.vertices {
            MeshVertices::Unweighted(vertices) => {
                Some(vertices.iter().flat_map(|[x, y]| [*x, *y]).collect())
            }
            MeshVertices::Weighted(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RegionAttachment {
    pub name: String,
    pub path: String,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub width: f32,
    pub height: f32,
    pub color: [f32; 4],
    pub region: TextureRegion,
    /// Texture coordinates in BL, UL, UR, BR corner order.
    pub uvs: [f32; 8],
    /// Local corner positions in BL, UL, UR, BR order.
    pub offset: [f32; 8],
}

impl Default for RegionAttachment {
    fn default() -> Self {
        Self {
            name: String::new(),
            path: String::new(),
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            width: 0.0,
            height: 0.0,
            color: [1.0; 4],
            region: TextureRegion::default(),
            uvs: [0.0; 8],
            offset: [0.0; 8],
        }
    }
}

const BLX: usize = 0;
const BLY: usize = 1;
const ULX: usize = 2;
const ULY: usize = 3;
const URX: usize = 4;
const URY: usize = 5;
const BRX: usize = 6;
const BRY: usize = 7;

impl RegionAttachment {
    pub fn set_uvs(&mut self, u: f32, v: f32, u2: f32, v2: f32, rotate: bool) {
        let uvs = &mut self.uvs;
        if rotate {
            uvs[URX] = u;
            uvs[URY] = v2;
            uvs[BRX] = u;
            uvs[BRY] = v;
            uvs[BLX] = u2;
            uvs[BLY] = v;
            uvs[ULX] = u2;
            uvs[ULY] = v2;
        } else {
            uvs[ULX] = u;
            uvs[ULY] = v2;
            uvs[URX] = u;
            uvs[URY] = v;
            uvs[BRX] = u2;
            uvs[BRY] = v;
            uvs[BLX] = u2;
            uvs[BLY] = v2;
        }
    }

    /// Recomputes the four local corners from size, scale, rotation and the region's trim.
    pub fn update_offset(&mut self) {
        let region = &self.region;
        let region_scale_x = self.width / region.original_width * self.scale_x;
        let region_scale_y = self.height / region.original_height * self.scale_y;
        let local_x = -self.width / 2.0 * self.scale_x + region.offset_x * region_scale_x;
        let local_y = -self.height / 2.0 * self.scale_y + region.offset_y * region_scale_y;
        let local_x2 = local_x + region.width * region_scale_x;
        let local_y2 = local_y + region.height * region_scale_y;

        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let local_x_cos = local_x * cos + self.x;
        let local_x_sin = local_x * sin;
        let local_y_cos = local_y * cos + self.y;
        let local_y_sin = local_y * sin;
        let local_x2_cos = local_x2 * cos + self.x;
        let local_x2_sin = local_x2 * sin;
        let local_y2_cos = local_y2 * cos + self.y;
        let local_y2_sin = local_y2 * sin;

        let offset = &mut self.offset;
        offset[BLX] = local_x_cos - local_y_sin;
        offset[BLY] = local_y_cos + local_x_sin;
        offset[ULX] = local_x_cos - local_y2_sin;
        offset[ULY] = local_y2_cos + local_x_sin;
        offset[URX] = local_x2_cos - local_y2_sin;
        offset[URY] = local_y2_cos + local_x2_sin;
        offset[BRX] = local_x2_cos - local_y_sin;
        offset[BRY] = local_y_cos + local_x2_sin;
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MeshAttachment {
    pub name: String,
    pub path: String,
    pub color: [f32; 4],
    pub vertex_data: VertexData,
    /// Normalized coordinates inside the region, one pair per vertex.
    pub region_uvs: Vec<[f32; 2]>,
    /// `region_uvs` mapped into page space by [`MeshAttachment::update_uvs`].
    pub uvs: Vec<[f32; 2]>,
    pub triangles: Vec<u16>,
    /// Number of hull vertex floats.
    pub hull_length: usize,
    pub edges: Vec<u16>,
    pub width: f32,
    pub height: f32,
    pub region: TextureRegion,
    pub parent_mesh: Option<AttachmentRef>,
}

impl Default for MeshAttachment {
    fn default() -> Self {
        Self {
            name: String::new(),
            path: String::new(),
            color: [1.0; 4],
            vertex_data: VertexData::default(),
            region_uvs: Vec::new(),
            uvs: Vec::new(),
            triangles: Vec::new(),
            hull_length: 0,
            edges: Vec::new(),
            width: 0.0,
            height: 0.0,
            region: TextureRegion::default(),
            parent_mesh: None,
        }
    }
}

impl MeshAttachment {
    pub fn update_uvs(&mut self) {
        let r = &self.region;
        let mut u = r.u;
        let mut v = r.v;

        self.uvs = match r.degrees {
            90 => {
                let texture_width = r.height / (r.u2 - r.u);
                let texture_height = r.width / (r.v2 - r.v);
                u -= (r.original_height - r.offset_y - r.height) / texture_width;
                v -= (r.original_width - r.offset_x - r.width) / texture_height;
                let width = r.original_height / texture_width;
                let height = r.original_width / texture_height;
                self.region_uvs
                    .iter()
                    .map(|[x, y]| [u + y * width, v + (1.0 - x) * height])
                    .collect()
            }
            180 => {
                let texture_width = r.width / (r.u2 - r.u);
                let texture_height = r.height / (r.v2 - r.v);
                u -= (r.original_width - r.offset_x - r.width) / texture_width;
                v -= r.offset_y / texture_height;
                let width = r.original_width / texture_width;
                let height = r.original_height / texture_height;
                self.region_uvs
                    .iter()
                    .map(|[x, y]| [u + (1.0 - x) * width, v + (1.0 - y) * height])
                    .collect()
            }
            270 => {
                let texture_height = r.height / (r.v2 - r.v);
                let texture_width = r.width / (r.u2 - r.u);
                u -= r.offset_y / texture_width;
                v -= r.offset_x / texture_height;
                let width = r.original_height / texture_width;
                let height = r.original_width / texture_height;
                self.region_uvs
                    .iter()
                    .map(|[x, y]| [u + (1.0 - y) * width, v + x * height])
                    .collect()
            }
            _ => {
                let texture_width = r.width / (r.u2 - r.u);
                let texture_height = r.height / (r.v2 - r.v);
                u -= r.offset_x / texture_width;
                v -= (r.original_height - r.offset_y - r.height) / texture_height;
                let width = r.original_width / texture_width;
                let height = r.original_height / texture_height;
                self.region_uvs
                    .iter()
                    .map(|[x, y]| [u + x * width, v + y * height])
                    .collect()
            }
        };
    }

    /// Shares `parent`'s geometry with this mesh. The deform source is left untouched.
    pub fn set_parent_mesh(&mut self, parent: &MeshAttachment, parent_ref: AttachmentRef) {
        self.vertex_data.vertices = parent.vertex_data.vertices.clone();
        self.vertex_data.world_vertices_length = parent.vertex_data.world_vertices_length;
        self.region_uvs = parent.region_uvs.clone();
        self.triangles = parent.triangles.clone();
        self.hull_length = parent.hull_length;
        self.edges = parent.edges.clone();
        self.width = parent.width;
        self.height = parent.height;
        self.parent_mesh = Some(parent_ref);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BoundingBoxAttachment {
    pub name: String,
    pub vertex_data: VertexData,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PathAttachment {
    pub name: String,
    pub vertex_data: VertexData,
    /// Cumulative curve lengths, one per bezier segment.
    pub lengths: Vec<f32>,
    pub closed: bool,
    pub constant_speed: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PointAttachment {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub color: [f32; 4],
}

impl Default for PointAttachment {
    fn default() -> Self {
        Self {
            name: String::new(),
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            color: [1.0; 4],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClippingAttachment {
    pub name: String,
    pub vertex_data: VertexData,
    pub end_slot: Option<usize>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Attachment {
    Region(RegionAttachment),
    BoundingBox(BoundingBoxAttachment),
    Mesh(MeshAttachment),
    /// A mesh sharing another mesh's geometry; `parent_mesh` is set once resolved.
    LinkedMesh(MeshAttachment),
    Path(PathAttachment),
    Point(PointAttachment),
    Clipping(ClippingAttachment),
}

impl Attachment {
    pub fn name(&self) -> &str {
        match self {
            Attachment::Region(a) => a.name.as_str(),
            Attachment::BoundingBox(a) => a.name.as_str(),
            Attachment::Mesh(a) | Attachment::LinkedMesh(a) => a.name.as_str(),
            Attachment::Path(a) => a.name.as_str(),
            Attachment::Point(a) => a.name.as_str(),
            Attachment::Clipping(a) => a.name.as_str(),
        }
    }

    pub fn kind(&self) -> AttachmentKind {
        match self {
            Attachment::Region(_) => AttachmentKind::Region,
            Attachment::BoundingBox(_) => AttachmentKind::BoundingBox,
            Attachment::Mesh(_) => AttachmentKind::Mesh,
            Attachment::LinkedMesh(_) => AttachmentKind::LinkedMesh,
            Attachment::Path(_) => AttachmentKind::Path,
            Attachment::Point(_) => AttachmentKind::Point,
            Attachment::Clipping(_) => AttachmentKind::Clipping,
        }
    }

    /// Vertex-bearing attachments expose their vertices; region and point attachments do not.
    pub fn vertex_data(&self) -> Option<&VertexData> {
        match self {
            Attachment::BoundingBox(a) => Some(&a.vertex_data),
            Attachment::Mesh(a) | Attachment::LinkedMesh(a) => Some(&a.vertex_data),
            Attachment::Path(a) => Some(&a.vertex_data),
            Attachment::Clipping(a) => Some(&a.vertex_data),
            Attachment::Region(_) | Attachment::Point(_) => None,
        }
    }

    pub fn vertex_data_mut(&mut self) -> Option<&mut VertexData> {
        match self {
            Attachment::BoundingBox(a) => Some(&mut a.vertex_data),
            Attachment::Mesh(a) | Attachment::LinkedMesh(a) => Some(&mut a.vertex_data),
            Attachment::Path(a) => Some(&mut a.vertex_data),
            Attachment::Clipping(a) => Some(&mut a.vertex_data),
            Attachment::Region(_) | Attachment::Point(_) => None,
        }
    }

    pub fn as_mesh(&self) -> Option<&MeshAttachment> {
        match self {
            Attachment::Mesh(a) | Attachment::LinkedMesh(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut MeshAttachment> {
        match self {
            Attachment::Mesh(a) | Attachment::LinkedMesh(a) => Some(a),
            _ => None,
        }
    }
}
