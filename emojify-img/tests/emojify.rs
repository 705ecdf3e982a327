use anyhow::Result;
use emojify_img::config::EmojifyConfig;
use emojify_img::emoji::EmojiSet;
use emojify_img::expression::Expression;
use emojify_img::pipeline::{AnnotationDetector, Notice, Pipeline};
use image::{Rgba, RgbaImage};
use tempfile::tempdir;

fn photo() -> RgbaImage {
    RgbaImage::from_fn(320, 240, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

fn pipeline(annotations: &str) -> Result<Pipeline> {
    Ok(Pipeline::new(
        Box::new(AnnotationDetector::from_json(annotations)?),
        EmojiSet::builtin(128)?,
        EmojifyConfig::default(),
    ))
}

#[test]
fn photo_without_faces_round_trips_unchanged() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("capture.png");
    photo().save(&path)?;

    let input = image::open(&path)?.into_rgba8();
    let res = pipeline(r#"{"faces": []}"#)?.run(&input)?;
    assert_eq!(res.notices, vec![Notice::NoFacesDetected]);

    let out_path = dir.path().join("out.png");
    res.image.save(&out_path)?;
    assert_eq!(image::open(&out_path)?.into_rgba8(), photo());
    Ok(())
}

#[test]
fn builtin_emoji_land_on_each_face() -> Result<()> {
    let input = photo();
    let res = pipeline(
        r#"{"faces": [
            {"bounds": {"x": 20, "y": 40, "width": 100, "height": 120},
             "smiling": 0.9, "left_eye_open": 0.05, "right_eye_open": 0.9},
            {"bounds": {"x": 180, "y": 60, "width": 100, "height": 100},
             "smiling": 0.1, "left_eye_open": 0.9, "right_eye_open": 0.9}
        ]}"#,
    )?
    .run(&input)?;

    assert!(res.notices.is_empty());
    let expressions: Vec<Expression> = res.faces.iter().map(|(_, e)| *e).collect();
    assert_eq!(expressions, vec![Expression::LeftWink, Expression::Frown]);

    // 90x81 emoji, face centers are painted yellow
    assert_eq!(*res.image.get_pixel(70, 100), Rgba([255, 204, 77, 255]));
    assert_eq!(*res.image.get_pixel(230, 115), Rgba([255, 204, 77, 255]));

    // Far corners are untouched
    assert_eq!(res.image.get_pixel(0, 0), input.get_pixel(0, 0));
    assert_eq!(res.image.get_pixel(319, 239), input.get_pixel(319, 239));
    Ok(())
}

#[test]
fn faces_beyond_the_edge_are_clipped() -> Result<()> {
    let input = photo();
    let res = pipeline(
        r#"{"faces": [
            {"bounds": {"x": 280, "y": -30, "width": 80, "height": 80},
             "smiling": 0.9, "left_eye_open": 0.9, "right_eye_open": 0.9}
        ]}"#,
    )?
    .run(&input)?;

    assert_eq!(res.image.dimensions(), input.dimensions());
    assert_eq!(res.faces[0].1, Expression::Smile);
    assert_eq!(res.image.get_pixel(0, 239), input.get_pixel(0, 239));
    Ok(())
}
