use crate::test_writer::SkelWriter;
use crate::{
    Atlas, AtlasAttachmentLoader, Attachment, AttachmentKind, AttachmentLoader, AttachmentRef,
    BlendMode, Curve, Error, MeshVertices, PlainAttachmentLoader, PositionMode, RotateMode,
    SkeletonBinary, SkeletonData, SpacingMode, Timeline,
};

const WHITE: [u8; 4] = [0xff; 4];

fn header(w: &mut SkelWriter, nonessential: bool) {
    w.str("Zr3cQm")
        .str("3.8.99")
        .f32s(&[-10.0, -5.0, 120.0, 240.0])
        .bool(nonessential);
    if nonessential {
        w.f32(30.0).str("./images/").string(None);
    }
}

fn strings(w: &mut SkelWriter, strings: &[&str]) {
    w.index(strings.len());
    for s in strings {
        w.str(s);
    }
}

/// Bone at (10, 20) with length 5.
fn bone(w: &mut SkelWriter, name: &str, parent: Option<usize>, nonessential: bool) {
    w.str(name);
    if let Some(parent) = parent {
        w.index(parent);
    }
    w.f32s(&[0.0, 10.0, 20.0, 1.0, 1.0, 0.0, 0.0, 5.0])
        .index(0)
        .bool(false);
    if nonessential {
        w.color([0x98, 0x98, 0x98, 0xff]);
    }
}

fn slot(w: &mut SkelWriter, name: &str, bone: usize, attachment: usize) {
    w.str(name)
        .index(bone)
        .color(WHITE)
        .color(WHITE)
        .index(attachment)
        .index(0);
}

/// One root bone and the given slots; `rest` writes everything from the default skin on.
fn skeleton(table: &[&str], slots: &[&str], rest: impl FnOnce(&mut SkelWriter)) -> Vec<u8> {
    let mut w = SkelWriter::new();
    header(&mut w, false);
    strings(&mut w, table);
    w.index(1);
    bone(&mut w, "root", None, false);
    w.index(slots.len());
    for name in slots {
        slot(&mut w, name, 0, 0);
    }
    // IK, transform, path.
    w.index(0).index(0).index(0);
    rest(&mut w);
    w.finish()
}

/// No default skin, no named skins, no events.
fn no_skins_or_events(w: &mut SkelWriter) {
    w.index(0).index(0).index(0);
}

fn empty_sections(w: &mut SkelWriter, count: usize) {
    for _ in 0..count {
        w.index(0);
    }
}

fn idle_bytes() -> Vec<u8> {
    skeleton(&[], &[], |w| {
        no_skins_or_events(w);
        w.index(1).str("idle");
        w.index(0);
        w.index(1)
            .index(0)
            .index(1)
            .u8(0)
            .index(2)
            .f32s(&[0.0, 0.0])
            .u8(0)
            .f32s(&[1.0, 90.0]);
        // IK, transform, path, deform, draw order, events.
        empty_sections(w, 6);
    })
}

fn decode(bytes: &[u8]) -> Result<SkeletonData, Error> {
    SkeletonBinary::new().read_skeleton_data(bytes)
}

#[test]
fn decodes_minimal_skeleton_with_rotate_timeline() {
    let data = decode(&idle_bytes()).unwrap();
    assert_eq!(data.hash.as_deref(), Some("Zr3cQm"));
    assert_eq!(data.version.as_deref(), Some("3.8.99"));
    assert_eq!((data.x, data.y, data.width, data.height), (-10.0, -5.0, 120.0, 240.0));
    assert_eq!(data.bones.len(), 1);
    assert_eq!(data.bones[0].parent, None);
    assert_eq!(data.bones[0].x, 10.0);
    assert!(data.skins.is_empty());
    assert_eq!(data.default_skin, None);

    let idle = data.find_animation("idle").unwrap();
    assert_eq!(idle.duration, 1.0);
    let Timeline::Rotate(rotate) = &idle.timelines[0] else {
        panic!("expected rotate timeline, got {:?}", idle.timelines[0]);
    };
    assert_eq!(rotate.bone_index, 0);
    let angles: Vec<f32> = rotate.frames.iter().map(|f| f.angle).collect();
    assert_eq!(angles, vec![0.0, 90.0]);
    assert_eq!(rotate.frames[0].curve, Curve::Linear);
}

#[test]
fn convenience_constructor_shares_decoder_output() {
    let data = SkeletonData::from_skel_bytes(&idle_bytes()).unwrap();
    assert_eq!(data.animations.len(), 1);
    let scaled = SkeletonData::from_skel_bytes_with_scale(&idle_bytes(), f32::NAN).unwrap();
    assert_eq!(scaled.bones[0].x, 10.0);
}

#[test]
fn scale_applies_to_positions_not_ratios() {
    let bytes = skeleton(&[], &[], |w| {
        no_skins_or_events(w);
        w.index(1).str("move");
        w.index(0);
        w.index(1).index(0).index(2);
        w.u8(1)
            .index(2)
            .f32s(&[0.0, 3.0, 4.0])
            .u8(2)
            .f32s(&[0.25, 0.0, 0.75, 1.0])
            .f32s(&[0.5, 1.0, 1.0]);
        w.u8(2).index(1).f32s(&[0.0, 3.0, 4.0]);
        empty_sections(w, 6);
    });

    let mut binary = SkeletonBinary::new().with_scale(2.0);
    assert_eq!(binary.scale(), 2.0);
    let data = binary.read_skeleton_data(&bytes).unwrap();
    let root = &data.bones[0];
    assert_eq!((root.x, root.y, root.length), (20.0, 40.0, 10.0));
    assert_eq!((root.scale_x, root.scale_y, root.rotation), (1.0, 1.0, 0.0));

    let timelines = &data.animations[0].timelines;
    let Timeline::Translate(translate) = &timelines[0] else {
        panic!("expected translate timeline");
    };
    assert_eq!((translate.frames[0].x, translate.frames[0].y), (6.0, 8.0));
    assert_eq!(
        translate.frames[0].curve,
        Curve::Bezier {
            cx1: 0.25,
            cy1: 0.0,
            cx2: 0.75,
            cy2: 1.0
        }
    );
    assert_eq!(translate.frames[1].curve, Curve::Linear);
    let Timeline::Scale(scale) = &timelines[1] else {
        panic!("expected scale timeline");
    };
    assert_eq!((scale.frames[0].x, scale.frames[0].y), (3.0, 4.0));
    assert_eq!(data.animations[0].duration, 0.5);

    binary.set_scale(f32::INFINITY);
    assert_eq!(binary.scale(), 1.0);
}

#[test]
fn rejected_version_stops_before_header_fields() {
    let mut w = SkelWriter::new();
    w.str("hash").str("3.8.75");
    let mut binary = SkeletonBinary::new();
    let err = binary.read_skeleton_data(&w.finish()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormatVersion { ref version } if version == "3.8.75"));
    assert_eq!(
        binary.error(),
        Some("Unsupported skeleton data, please export with a newer version of Spine.")
    );
}

#[test]
fn every_truncation_reports_end_of_data() {
    let bytes = idle_bytes();
    for len in 0..bytes.len() {
        let err = decode(&bytes[..len]).unwrap_err();
        assert!(
            matches!(err, Error::UnexpectedEndOfData { .. }),
            "prefix {len}: {err}"
        );
    }
}

#[test]
fn error_string_is_kept_until_next_read() {
    let bad_slot = skeleton(&[], &["body"], |w| {
        no_skins_or_events(w);
        w.index(1).str("bad");
        w.index(1).index(0).index(1).u8(7).index(0);
    });
    let bad_bone = skeleton(&[], &[], |w| {
        no_skins_or_events(w);
        w.index(1).str("bad");
        w.index(0);
        w.index(1).index(0).index(1).u8(9).index(0);
    });

    let mut binary = SkeletonBinary::new();
    assert!(binary.read_skeleton_data(&bad_slot).is_err());
    assert_eq!(binary.error(), Some("Invalid timeline type for a slot: body"));

    assert!(binary.read_skeleton_data(&bad_bone).is_err());
    assert_eq!(binary.error(), Some("Invalid timeline type for a bone: root"));

    binary.read_skeleton_data(&idle_bytes()).unwrap();
    assert_eq!(binary.error(), None);
}

#[test]
fn slot_timelines_decode_attachments_and_colors() {
    let bytes = skeleton(&["img"], &["body"], |w| {
        no_skins_or_events(w);
        w.index(1).str("tint");
        w.index(1).index(0).index(3);
        w.u8(0).index(2);
        w.f32(0.0).index(1);
        w.f32(0.5).index(0);
        w.u8(1).index(2);
        w.f32(0.0).color([0xff, 0x00, 0x00, 0xff]).u8(1);
        w.f32(1.0).color(WHITE);
        // Dark color bytes are (a, r, g, b).
        w.u8(2).index(2);
        w.f32(0.0)
            .color(WHITE)
            .color([0x11, 0xff, 0x00, 0x80])
            .u8(2)
            .f32s(&[0.25, 0.0, 0.75, 1.0]);
        w.f32(2.0).color(WHITE).color([0x00; 4]);
        // Bone, IK, transform, path, deform, draw order, events.
        empty_sections(w, 7);
    });

    let data = decode(&bytes).unwrap();
    let tint = data.find_animation("tint").unwrap();
    assert_eq!(tint.duration, 2.0);
    assert_eq!(tint.timelines.len(), 3);

    let Timeline::Attachment(attachment) = &tint.timelines[0] else {
        panic!("expected attachment timeline, got {:?}", tint.timelines[0]);
    };
    assert_eq!(attachment.slot_index, 0);
    let names: Vec<Option<&str>> = attachment.frames.iter().map(|f| f.name.as_deref()).collect();
    assert_eq!(names, vec![Some("img"), None]);

    let Timeline::Color(color) = &tint.timelines[1] else {
        panic!("expected color timeline, got {:?}", tint.timelines[1]);
    };
    assert_eq!(color.frames[0].color, [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(color.frames[0].curve, Curve::Stepped);
    assert_eq!(color.frames[1].curve, Curve::Linear);

    let Timeline::TwoColor(two_color) = &tint.timelines[2] else {
        panic!("expected two-color timeline, got {:?}", tint.timelines[2]);
    };
    let first = &two_color.frames[0];
    assert_eq!(first.light, [1.0; 4]);
    assert_eq!(&first.dark[..2], &[1.0, 0.0]);
    assert!((first.dark[2] - 128.0 / 255.0).abs() < 1e-6);
    assert_eq!(
        first.curve,
        Curve::Bezier {
            cx1: 0.25,
            cy1: 0.0,
            cx2: 0.75,
            cy2: 1.0,
        }
    );
    assert_eq!(two_color.frames[1].dark, [0.0; 3]);
    assert_eq!(two_color.frames[1].curve, Curve::Linear);
}

#[test]
fn draw_order_offsets_rebuild_the_permutation() {
    let bytes = skeleton(&[], &["a", "b", "c", "d", "e"], |w| {
        no_skins_or_events(w);
        w.index(1).str("shuffle");
        empty_sections(w, 6);
        w.index(3);
        w.f32(0.0).index(0);
        w.f32(0.5).index(1).index(0).index(2);
        // Offsets can be negative without zig-zag encoding.
        w.f32(1.0).index(1).index(3).varint((-3i32) as u32);
        w.index(0);
    });
    let data = decode(&bytes).unwrap();
    let animation = &data.animations[0];
    assert_eq!(animation.duration, 1.0);
    let Timeline::DrawOrder(timeline) = &animation.timelines[0] else {
        panic!("expected draw order timeline");
    };
    let orders: Vec<&[usize]> = timeline.frames.iter().map(|f| f.draw_order.as_slice()).collect();
    assert_eq!(
        orders,
        vec![
            &[0usize, 1, 2, 3, 4][..],
            &[1, 2, 0, 3, 4][..],
            &[3, 0, 1, 2, 4][..]
        ]
    );
}

#[test]
fn draw_order_rejects_out_of_range_targets() {
    let bytes = skeleton(&[], &["a", "b"], |w| {
        no_skins_or_events(w);
        w.index(1).str("broken");
        empty_sections(w, 6);
        w.index(1).f32(0.0).index(1).index(1).index(1);
        w.index(0);
    });
    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, Error::InvalidDrawOrder { ref animation, .. } if animation == "broken"));
}

/// Default skin with one two-vertex mesh "body" on slot 0; `vertices` writes the vertex block.
fn mesh_skeleton(
    vertices: impl FnOnce(&mut SkelWriter),
    animation: impl FnOnce(&mut SkelWriter),
) -> Vec<u8> {
    skeleton(&["body", "ghost"], &["slot"], |w| {
        w.index(1).index(0).index(1);
        w.index(1).index(0).u8(2).index(0).color(WHITE);
        w.index(2).f32s(&[0.0, 0.0, 1.0, 1.0]).u16s(&[]);
        vertices(w);
        w.index(2);
        // Named skins, events.
        w.index(0).index(0);
        animation(w);
    })
}

fn unweighted(w: &mut SkelWriter) {
    w.bool(false).f32s(&[1.0, 2.0, 3.0, 4.0]);
}

/// Three weight records in total.
fn weighted(w: &mut SkelWriter) {
    w.bool(true);
    w.index(1).index(0).f32s(&[1.0, 2.0, 1.0]);
    w.index(2)
        .index(0)
        .f32s(&[3.0, 4.0, 0.5])
        .index(0)
        .f32s(&[5.0, 6.0, 0.5]);
}

fn deform_animation(attachment: usize) -> impl FnOnce(&mut SkelWriter) {
    move |w| {
        w.index(1).str("deform");
        empty_sections(w, 5);
        w.index(1).index(0).index(1).index(0).index(1).index(attachment);
        w.index(2);
        w.f32(0.0).index(0).u8(1);
        w.f32(1.0).index(2).index(1).f32s(&[0.5, 0.5]);
        empty_sections(w, 2);
    }
}

fn deform_frames(data: &SkeletonData) -> Vec<Vec<f32>> {
    let Timeline::Deform(timeline) = &data.animations[0].timelines[0] else {
        panic!("expected deform timeline");
    };
    assert_eq!(timeline.attachment, "body");
    assert_eq!(timeline.frames[0].curve, Curve::Stepped);
    timeline.frames.iter().map(|f| f.vertices.clone()).collect()
}

#[test]
fn unweighted_deform_adds_setup_positions() {
    let data = decode(&mesh_skeleton(unweighted, deform_animation(1))).unwrap();
    let mesh = data.default_skin().unwrap().attachment(0, "body").unwrap();
    let mesh = mesh.as_mesh().unwrap();
    assert_eq!(mesh.region_uvs, vec![[0.0, 0.0], [1.0, 1.0]]);
    assert_eq!(mesh.uvs, mesh.region_uvs);
    assert_eq!(mesh.hull_length, 4);
    assert_eq!(
        mesh.vertex_data.deform_attachment,
        Some(AttachmentRef {
            skin: 0,
            slot_index: 0,
            name: "body".to_string()
        })
    );

    assert_eq!(
        deform_frames(&data),
        vec![vec![1.0, 2.0, 3.0, 4.0], vec![1.0, 2.5, 3.5, 4.0]]
    );

    let scaled = SkeletonBinary::new()
        .with_scale(2.0)
        .read_skeleton_data(&mesh_skeleton(unweighted, deform_animation(1)))
        .unwrap();
    assert_eq!(deform_frames(&scaled)[1], vec![2.0, 5.0, 7.0, 8.0]);
}

#[test]
fn weighted_deform_stores_offsets_only() {
    let data = decode(&mesh_skeleton(weighted, deform_animation(1))).unwrap();
    let mesh = data.skins[0].attachment(0, "body").unwrap().as_mesh().unwrap();
    let MeshVertices::Weighted(vertices) = &mesh.vertex_data.vertices else {
        panic!("expected weighted vertices");
    };
    assert_eq!(vertices[1].len(), 2);
    assert_eq!(mesh.vertex_data.deform_length(), 6);

    assert_eq!(
        deform_frames(&data),
        vec![vec![0.0; 6], vec![0.0, 0.5, 0.5, 0.0, 0.0, 0.0]]
    );
}

#[test]
fn deform_of_missing_attachment_fails() {
    let mut binary = SkeletonBinary::new();
    let err = binary
        .read_skeleton_data(&mesh_skeleton(unweighted, deform_animation(2)))
        .unwrap_err();
    assert_eq!(err.to_string(), "Attachment not found: ghost");
    assert_eq!(binary.error(), Some("Attachment not found: ghost"));
}

/// Linked mesh "skin-a" stored before its parent "body" in the default skin.
fn linked_mesh_skeleton(parent_skin: usize) -> Vec<u8> {
    skeleton(&["skin-a", "body", "ghost"], &["slot"], |w| {
        w.index(1).index(0).index(2);
        w.index(1)
            .index(0)
            .u8(3)
            .index(0)
            .color(WHITE)
            .index(parent_skin)
            .index(2)
            .bool(true);
        w.index(2).index(0).u8(2).index(0).color(WHITE);
        w.index(3)
            .f32s(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0])
            .u16s(&[0, 1, 2])
            .bool(false)
            .f32s(&[0.0, 0.0, 4.0, 0.0, 0.0, 4.0])
            .index(3);
        // Named skins, events, animations.
        empty_sections(w, 3);
    })
}

#[derive(Default)]
struct RecordingLoader {
    created: Vec<String>,
    configured: Vec<String>,
}

impl AttachmentLoader for RecordingLoader {
    fn create_attachment(
        &mut self,
        skin: &str,
        kind: AttachmentKind,
        name: &str,
        path: Option<&str>,
    ) -> Result<Attachment, Error> {
        self.created.push(name.to_string());
        PlainAttachmentLoader.create_attachment(skin, kind, name, path)
    }

    fn configure_attachment(&mut self, attachment: &mut Attachment) -> Result<(), Error> {
        self.configured.push(attachment.name().to_string());
        Ok(())
    }
}

#[test]
fn linked_mesh_resolves_parent_read_later() {
    let mut binary = SkeletonBinary::with_loader(RecordingLoader::default());
    let data = binary.read_skeleton_data(&linked_mesh_skeleton(0)).unwrap();

    let linked = data.skins[0].attachment(0, "skin-a").unwrap();
    assert_eq!(linked.kind(), AttachmentKind::LinkedMesh);
    let mesh = linked.as_mesh().unwrap();
    assert_eq!(mesh.triangles, vec![0, 1, 2]);
    assert_eq!(mesh.vertex_data.world_vertices_length, 6);
    assert_eq!(mesh.uvs.len(), 3);
    let body = AttachmentRef {
        skin: 0,
        slot_index: 0,
        name: "body".to_string(),
    };
    assert_eq!(mesh.parent_mesh.as_ref(), Some(&body));
    assert_eq!(mesh.vertex_data.deform_attachment.as_ref(), Some(&body));

    let loader = binary.into_loader();
    assert_eq!(loader.created, vec!["skin-a", "body"]);
    // Linked meshes are configured only after their parent geometry is copied.
    assert_eq!(loader.configured, vec!["body", "skin-a"]);
}

#[test]
fn linked_mesh_with_unknown_skin_fails() {
    let mut binary = SkeletonBinary::new();
    let err = binary
        .read_skeleton_data(&linked_mesh_skeleton(3))
        .unwrap_err();
    assert_eq!(err.to_string(), "Skin not found: ghost");
    assert_eq!(binary.error(), Some("Skin not found: ghost"));
}

#[test]
fn nonessential_blocks_are_read_or_skipped() {
    let mut w = SkelWriter::new();
    header(&mut w, true);
    strings(&mut w, &["head", "marker", "bounds"]);
    w.index(2);
    bone(&mut w, "root", None, true);
    bone(&mut w, "neck", Some(0), true);
    w.index(2);
    slot(&mut w, "head", 1, 1);
    // Dark color bytes are (a, r, g, b).
    w.str("fx")
        .index(0)
        .color(WHITE)
        .color([0xff, 0x00, 0x00, 0x00])
        .index(0)
        .index(1);
    w.index(0).index(0).index(0);

    w.index(2);
    w.index(0).index(1);
    w.index(1)
        .index(0)
        .u8(0)
        .index(0)
        .f32s(&[0.0, 1.0, 2.0, 1.0, 1.0, 20.0, 10.0])
        .color([0xff, 0x00, 0x00, 0xff]);
    w.index(1).index(2);
    w.index(2)
        .index(0)
        .u8(5)
        .f32s(&[45.0, 3.0, 4.0])
        .color([0x00, 0xff, 0x00, 0xff]);
    w.index(3)
        .index(0)
        .u8(1)
        .index(2)
        .bool(false)
        .f32s(&[0.0, 0.0, 1.0, 0.0])
        .color(WHITE);
    empty_sections(&mut w, 3);

    let data = decode(&w.finish()).unwrap();
    assert_eq!(data.bones[1].parent, Some(0));
    assert_eq!(data.slots[0].attachment_name.as_deref(), Some("head"));
    assert_eq!(data.slots[0].dark_color, None);
    assert_eq!(data.slots[1].dark_color, Some([0.0, 0.0, 0.0, 1.0]));
    assert_eq!(data.slots[1].blend_mode, BlendMode::Additive);

    let skin = data.default_skin().unwrap();
    assert_eq!(skin.attachment_count(), 3);
    let Some(Attachment::Region(region)) = skin.attachment(0, "head") else {
        panic!("expected region");
    };
    assert_eq!(region.path, "head");
    assert_eq!(region.color, [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(&region.offset[..2], &[-9.0, -3.0]);
    assert_eq!(&region.offset[4..6], &[11.0, 7.0]);

    let Some(Attachment::Point(point)) = skin.attachment(1, "marker") else {
        panic!("expected point");
    };
    assert_eq!((point.x, point.y, point.rotation), (3.0, 4.0, 45.0));
    assert_eq!(point.color, [0.0, 1.0, 0.0, 1.0]);

    let bounds = skin.attachment(1, "bounds").unwrap();
    assert_eq!(bounds.kind(), AttachmentKind::BoundingBox);
    assert_eq!(bounds.vertex_data().unwrap().world_vertices_length, 4);
}

#[test]
fn scale_applies_to_attachment_geometry() {
    let mut w = SkelWriter::new();
    header(&mut w, true);
    strings(&mut w, &["panel", "mesh", "rail", "marker", "clip"]);
    w.index(1);
    bone(&mut w, "root", None, true);
    w.index(2);
    slot(&mut w, "body", 0, 0);
    slot(&mut w, "mask", 0, 0);
    w.index(0).index(0).index(0);

    w.index(2);
    w.index(0).index(3);
    w.index(1)
        .index(0)
        .u8(0)
        .index(0)
        .f32s(&[0.0, 3.0, 4.0, 1.5, 1.0, 20.0, 10.0])
        .color(WHITE);
    w.index(2)
        .index(0)
        .u8(2)
        .index(0)
        .color(WHITE)
        .index(3)
        .f32s(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0])
        .u16s(&[0, 1, 2])
        .bool(false)
        .f32s(&[0.0, 0.0, 5.0, 0.0, 0.0, 5.0])
        .index(3)
        .u16s(&[0, 1])
        .f32s(&[16.0, 12.0]);
    w.index(4)
        .index(0)
        .u8(5)
        .f32s(&[30.0, 1.5, -2.0])
        .color(WHITE);
    w.index(1).index(2);
    w.index(3)
        .index(0)
        .u8(4)
        .bool(true)
        .bool(false)
        .index(3)
        .bool(false)
        .f32s(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .f32(7.0)
        .color(WHITE);
    // End slot comes before the vertex count.
    w.index(5)
        .index(0)
        .u8(6)
        .index(1)
        .index(2)
        .bool(false)
        .f32s(&[0.0, 0.0, 1.0, 1.0])
        .color(WHITE);
    empty_sections(&mut w, 3);

    let data = SkeletonBinary::new()
        .with_scale(2.0)
        .read_skeleton_data(&w.finish())
        .unwrap();
    let skin = data.default_skin().unwrap();
    assert_eq!(skin.attachment_count(), 5);

    let Some(Attachment::Region(region)) = skin.attachment(0, "panel") else {
        panic!("expected region");
    };
    assert_eq!((region.x, region.y), (6.0, 8.0));
    assert_eq!((region.width, region.height), (40.0, 20.0));
    assert_eq!((region.scale_x, region.scale_y), (1.5, 1.0));

    let Some(Attachment::Mesh(mesh)) = skin.attachment(0, "mesh") else {
        panic!("expected mesh");
    };
    assert_eq!(
        mesh.vertex_data.vertices,
        MeshVertices::Unweighted(vec![[0.0, 0.0], [10.0, 0.0], [0.0, 10.0]])
    );
    assert_eq!(mesh.region_uvs, vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
    assert_eq!(mesh.hull_length, 6);
    assert_eq!(mesh.edges, vec![0, 1]);
    assert_eq!((mesh.width, mesh.height), (32.0, 24.0));

    let Some(Attachment::Point(point)) = skin.attachment(0, "marker") else {
        panic!("expected point");
    };
    assert_eq!((point.x, point.y, point.rotation), (3.0, -4.0, 30.0));

    let Some(Attachment::Path(rail)) = skin.attachment(1, "rail") else {
        panic!("expected path");
    };
    assert!(rail.closed);
    assert!(!rail.constant_speed);
    assert_eq!(
        rail.vertex_data.vertices,
        MeshVertices::Unweighted(vec![[2.0, 4.0], [6.0, 8.0], [10.0, 12.0]])
    );
    assert_eq!(rail.lengths, vec![14.0]);

    let Some(Attachment::Clipping(clip)) = skin.attachment(1, "clip") else {
        panic!("expected clipping");
    };
    assert_eq!(clip.end_slot, Some(1));
    assert_eq!(clip.vertex_data.world_vertices_length, 4);
    assert_eq!(
        clip.vertex_data.vertices,
        MeshVertices::Unweighted(vec![[0.0, 0.0], [2.0, 2.0]])
    );
}

fn constraint_skeleton(last_path_kind: u8) -> Vec<u8> {
    let mut w = SkelWriter::new();
    header(&mut w, false);
    strings(&mut w, &[]);
    w.index(2);
    bone(&mut w, "root", None, false);
    bone(&mut w, "arm", Some(0), false);
    w.index(1);
    slot(&mut w, "hand", 1, 0);

    w.index(1).str("aim").index(1).bool(true);
    w.index(1).index(1).index(0);
    w.f32s(&[0.75, 2.0]).i8(-1).bool(false).bool(true).bool(false);

    w.index(1).str("follow").index(2).bool(false);
    w.index(1).index(1).index(0).bool(true).bool(false);
    w.f32s(&[15.0, 3.0, 4.0, 0.5, 0.5, 0.0, 1.0, 1.0, 0.0, 0.0]);

    w.index(1).str("rail").index(3).bool(false);
    w.index(1).index(1).index(0);
    // Fixed position, percent spacing, chain rotation.
    w.index(0).index(2).index(1);
    w.f32s(&[0.0, 5.0, 0.5, 1.0, 1.0]);

    no_skins_or_events(&mut w);
    w.index(1).str("rail");
    empty_sections(&mut w, 2);
    w.index(1).index(0).index(1);
    w.f32s(&[0.0, 1.0, 0.0]).i8(1).bool(true).bool(false);
    w.index(1).index(0).index(1);
    w.f32s(&[0.0, 1.0, 0.5, 0.25, 0.0]);
    w.index(1).index(0).index(3);
    w.u8(0).index(1).f32s(&[0.0, 5.0]);
    w.u8(1).index(1).f32s(&[0.0, 0.5]);
    w.u8(last_path_kind).index(1).f32s(&[2.0, 1.0, 0.5]);
    empty_sections(&mut w, 3);
    w.finish()
}

#[test]
fn constraints_and_their_timelines_follow_modes() {
    let data = SkeletonBinary::new()
        .with_scale(2.0)
        .read_skeleton_data(&constraint_skeleton(2))
        .unwrap();

    let ik = data.find_ik_constraint("aim").unwrap();
    assert_eq!((ik.order, ik.bones.as_slice(), ik.target), (1, &[1][..], 0));
    assert_eq!((ik.mix, ik.softness, ik.bend_direction), (0.75, 2.0, -1));
    assert!(ik.skin_required && ik.stretch && !ik.compress && !ik.uniform);

    let transform = data.find_transform_constraint("follow").unwrap();
    assert!(transform.local && !transform.relative);
    assert_eq!((transform.offset_x, transform.offset_y), (6.0, 8.0));
    assert_eq!(transform.offset_rotation, 15.0);

    let path = data.find_path_constraint("rail").unwrap();
    assert_eq!(path.target, 0);
    assert_eq!(path.position_mode, PositionMode::Fixed);
    assert_eq!(path.spacing_mode, SpacingMode::Percent);
    assert_eq!(path.rotate_mode, RotateMode::Chain);
    assert_eq!((path.position, path.spacing), (10.0, 0.5));

    let animation = data.find_animation("rail").unwrap();
    assert_eq!(animation.duration, 2.0);
    let kinds: Vec<&str> = animation
        .timelines
        .iter()
        .map(|t| match t {
            Timeline::IkConstraint(_) => "ik",
            Timeline::TransformConstraint(_) => "transform",
            Timeline::PathPosition(_) => "position",
            Timeline::PathSpacing(_) => "spacing",
            Timeline::PathMix(_) => "mix",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["ik", "transform", "position", "spacing", "mix"]);

    let Timeline::IkConstraint(ik) = &animation.timelines[0] else {
        unreachable!();
    };
    assert_eq!(ik.frames[0].bend_direction, 1);
    let Timeline::PathPosition(position) = &animation.timelines[2] else {
        unreachable!();
    };
    assert_eq!(position.frames[0].value, 10.0);
    let Timeline::PathSpacing(spacing) = &animation.timelines[3] else {
        unreachable!();
    };
    assert_eq!(spacing.frames[0].value, 0.5);
}

#[test]
fn unknown_path_timeline_is_fatal() {
    let err = decode(&constraint_skeleton(4)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid timeline type for a path constraint: rail"
    );
}

#[test]
fn named_skins_keep_constraint_lists() {
    let bytes = skeleton(&["weapon"], &[], |w| {
        w.index(0).index(1);
        w.index(1).index(1).index(0);
        empty_sections(w, 4);
        empty_sections(w, 2);
    });
    let data = decode(&bytes).unwrap();
    assert_eq!(data.default_skin, None);
    let skin = data.find_skin("weapon").unwrap();
    assert_eq!(skin.bones, vec![0]);
    assert_eq!(skin.attachment_count(), 0);

    let bytes = skeleton(&["weapon"], &[], |w| {
        w.index(0).index(1);
        w.index(1).index(1).index(3);
    });
    assert_eq!(
        decode(&bytes).unwrap_err().to_string(),
        "Invalid bone index: 3 (len=1)"
    );
}

#[test]
fn events_carry_definition_defaults() {
    let bytes = skeleton(&["footstep", "hit"], &[], |w| {
        w.index(0).index(0);
        w.index(2);
        w.index(1)
            .varint_signed(-5)
            .f32(0.5)
            .str("step")
            .str("sfx.ogg")
            .f32s(&[0.8, -0.25]);
        w.index(2).varint_signed(0).f32(0.0).string(None).string(None);

        w.index(1).str("walk");
        empty_sections(w, 7);
        w.index(2);
        w.f32(0.25)
            .index(0)
            .varint_signed(3)
            .f32(1.5)
            .bool(false)
            .f32s(&[0.5, 0.1]);
        w.f32(0.75)
            .index(1)
            .varint_signed(-1)
            .f32(0.0)
            .bool(true)
            .str("boom");
    });
    let data = decode(&bytes).unwrap();

    let footstep = data.find_event("footstep").unwrap();
    assert_eq!(footstep.int_value, -5);
    assert_eq!(footstep.audio_path.as_deref(), Some("sfx.ogg"));
    assert_eq!((footstep.volume, footstep.balance), (0.8, -0.25));
    let hit = data.find_event("hit").unwrap();
    assert_eq!((hit.volume, hit.balance), (1.0, 0.0));
    assert_eq!(hit.string_value, None);

    let walk = data.find_animation("walk").unwrap();
    assert_eq!(walk.duration, 0.75);
    let Timeline::Event(timeline) = &walk.timelines[0] else {
        panic!("expected event timeline");
    };
    let first = &timeline.events[0];
    assert_eq!((first.data, first.int_value, first.float_value), (0, 3, 1.5));
    assert_eq!(first.string_value.as_deref(), Some("step"));
    assert_eq!((first.volume, first.balance), (0.5, 0.1));
    let second = &timeline.events[1];
    assert_eq!((second.data, second.int_value), (1, -1));
    assert_eq!(second.string_value.as_deref(), Some("boom"));
    assert_eq!((second.volume, second.balance), (1.0, 0.0));
    assert_ne!(first, second);
    assert_eq!(data.events[1], data.events[1].clone());
}

const ATLAS: &str = r#"
parts.png
size: 64,32
format: RGBA8888
filter: Linear,Linear
repeat: none
head
  rotate: false
  xy: 0, 0
  size: 32, 16
  orig: 32, 16
  offset: 0, 0
  index: -1
"#;

fn region_skeleton(region: &str) -> Vec<u8> {
    skeleton(&[region], &["head"], |w| {
        w.index(1).index(0).index(1);
        w.index(1)
            .index(0)
            .u8(0)
            .index(0)
            .f32s(&[0.0, 0.0, 0.0, 1.0, 1.0, 32.0, 16.0])
            .color(WHITE);
        empty_sections(w, 3);
    })
}

#[test]
fn atlas_loader_supplies_region_texture() {
    let atlas = Atlas::parse(ATLAS).unwrap();
    let mut binary = SkeletonBinary::with_loader(AtlasAttachmentLoader::new(&atlas));
    let data = binary.read_skeleton_data(&region_skeleton("head")).unwrap();
    let Some(Attachment::Region(region)) = data.skins[0].attachment(0, "head") else {
        panic!("expected region");
    };
    assert_eq!(region.uvs, [0.5, 0.5, 0.0, 0.5, 0.0, 0.0, 0.5, 0.0]);
    assert_eq!(region.region.original_width, 32.0);
    assert_eq!(&region.offset[..2], &[-16.0, -8.0]);

    let err = binary
        .read_skeleton_data(&region_skeleton("tail"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Region not found: tail");
    assert_eq!(binary.error(), Some("Region not found: tail"));
}

#[test]
fn file_entry_point_reports_unreadable_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut binary = SkeletonBinary::new();

    let missing = dir.path().join("missing.skel");
    let err = binary.read_skeleton_data_file(&missing).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Unable to read skeleton file: {}", missing.display())
    );
    assert!(binary.error().unwrap().starts_with("Unable to read skeleton file"));

    let empty = dir.path().join("empty.skel");
    std::fs::write(&empty, b"").unwrap();
    assert!(matches!(
        binary.read_skeleton_data_file(&empty),
        Err(Error::FileRead { .. })
    ));

    let idle = dir.path().join("idle.skel");
    std::fs::write(&idle, idle_bytes()).unwrap();
    let data = binary.read_skeleton_data_file(&idle).unwrap();
    assert_eq!(data.animations[0].name, "idle");
    assert_eq!(binary.error(), None);
}

#[cfg(feature = "serde")]
#[test]
fn decoded_tree_serializes() {
    let data = decode(&linked_mesh_skeleton(0)).unwrap();
    let json = serde_json::to_value(&data).unwrap();
    assert_eq!(json["bones"][0]["name"], "root");
    assert_eq!(json["skins"][0]["name"], "default");
    assert_eq!(
        json["skins"][0]["attachments"]["0"]["skin-a"]["LinkedMesh"]["parent_mesh"]["name"],
        "body"
    );
}
