use serde_json::json;
use spine_skel::{Atlas, AtlasAttachmentLoader, SkeletonBinary, SkeletonData, Timeline};
use std::path::PathBuf;

fn timeline_kind(timeline: &Timeline) -> &'static str {
    match timeline {
        Timeline::Attachment(_) => "attachment",
        Timeline::Color(_) => "color",
        Timeline::TwoColor(_) => "two_color",
        Timeline::Rotate(_) => "rotate",
        Timeline::Translate(_) => "translate",
        Timeline::Scale(_) => "scale",
        Timeline::Shear(_) => "shear",
        Timeline::IkConstraint(_) => "ik",
        Timeline::TransformConstraint(_) => "transform",
        Timeline::PathPosition(_) => "path_position",
        Timeline::PathSpacing(_) => "path_spacing",
        Timeline::PathMix(_) => "path_mix",
        Timeline::Deform(_) => "deform",
        Timeline::DrawOrder(_) => "draw_order",
        Timeline::Event(_) => "event",
    }
}

fn summary(data: &SkeletonData) -> serde_json::Value {
    let skins: Vec<_> = data
        .skins
        .iter()
        .map(|skin| {
            json!({
                "name": skin.name,
                "attachments": skin.attachment_count(),
            })
        })
        .collect();
    let animations: Vec<_> = data
        .animations
        .iter()
        .map(|animation| {
            let timelines: Vec<_> = animation
                .timelines
                .iter()
                .map(|t| json!({ "kind": timeline_kind(t), "frames": t.frame_count() }))
                .collect();
            json!({
                "name": animation.name,
                "duration": animation.duration,
                "timelines": timelines,
            })
        })
        .collect();

    json!({
        "hash": data.hash,
        "version": data.version,
        "size": [data.width, data.height],
        "bones": data.bones.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(),
        "slots": data.slots.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        "ik_constraints": data.ik_constraints.len(),
        "transform_constraints": data.transform_constraints.len(),
        "path_constraints": data.path_constraints.len(),
        "skins": skins,
        "events": data.events.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
        "animations": animations,
    })
}

fn main() {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut positional = Vec::<String>::new();
    let mut atlas_path: Option<PathBuf> = None;
    let mut scale = 1.0f32;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--atlas" => {
                atlas_path = args.get(i + 1).map(PathBuf::from);
                i += 2;
            }
            "--scale" => {
                scale = args
                    .get(i + 1)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1.0);
                i += 2;
            }
            other => {
                positional.push(other.to_string());
                i += 1;
            }
        }
    }

    let skel_path = positional.first().map(PathBuf::from).unwrap_or_else(|| {
        PathBuf::from("./assets/spineboy/export/spineboy-pro.skel")
    });

    let data = match &atlas_path {
        Some(atlas_path) => {
            let text = std::fs::read_to_string(atlas_path).expect("read atlas");
            let atlas = Atlas::parse(&text).expect("parse atlas");
            SkeletonBinary::with_loader(AtlasAttachmentLoader::new(&atlas))
                .with_scale(scale)
                .read_skeleton_data_file(&skel_path)
        }
        None => SkeletonBinary::new()
            .with_scale(scale)
            .read_skeleton_data_file(&skel_path),
    };

    match data {
        Ok(data) => println!(
            "{}",
            serde_json::to_string_pretty(&summary(&data)).expect("json")
        ),
        Err(err) => {
            eprintln!("{}: {err}", skel_path.display());
            std::process::exit(1);
        }
    }
}
