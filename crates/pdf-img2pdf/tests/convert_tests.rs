use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lopdf::Document;
use pdf_img2pdf::*;
use std::io::Cursor;

fn create_test_image(name: &str, width: u32, height: u32) -> ImageSource {
    // Four colour bands so greyscale conversion has something to flatten
    let img = RgbImage::from_fn(width, height, |x, _| match (x * 4 / width) % 4 {
        0 => Rgb([220, 30, 30]),
        1 => Rgb([30, 200, 40]),
        2 => Rgb([40, 60, 230]),
        _ => Rgb([240, 220, 20]),
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    ImageSource::new(name, buf.into_inner())
}

/// A JPEG whose EXIF Orientation tag is 6 (rotate 90° clockwise to display)
fn create_rotated_jpeg(name: &str, width: u32, height: u32) -> ImageSource {
    let img = RgbImage::from_pixel(width, height, Rgb([90, 140, 200]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Jpeg)
        .unwrap();
    let jpeg = buf.into_inner();

    #[rustfmt::skip]
    let app1: [u8; 36] = [
        0xFF, 0xE1, 0x00, 0x22,
        b'E', b'x', b'i', b'f', 0x00, 0x00,
        // Big-endian TIFF header, first IFD at offset 8
        b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08,
        0x00, 0x01,
        // Orientation (0x0112), SHORT, count 1, value 6
        0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x06, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
    ];

    let mut data = Vec::with_capacity(jpeg.len() + app1.len());
    data.extend_from_slice(&jpeg[..2]);
    data.extend_from_slice(&app1);
    data.extend_from_slice(&jpeg[2..]);
    ImageSource::new(name, data)
}

/// What a rendered page looks like after reloading the PDF
struct RenderedPage {
    media_box: (f32, f32),
    /// (width, height, x, y) from the `cm` operator
    draw: (f32, f32, f32, f32),
    color_space: Vec<u8>,
    image: DynamicImage,
}

fn inspect(pdf: &[u8]) -> Vec<RenderedPage> {
    let doc = Document::load_mem(pdf).unwrap();
    let mut pages = Vec::new();

    for (_, page_id) in doc.get_pages() {
        let page = doc.get_dictionary(page_id).unwrap();

        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        let media_box = (
            media_box[2].as_float().unwrap(),
            media_box[3].as_float().unwrap(),
        );

        let content_id = page.get(b"Contents").unwrap().as_reference().unwrap();
        let content = doc.get_object(content_id).unwrap().as_stream().unwrap();
        let text = String::from_utf8(content.content.clone()).unwrap();
        let tokens: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(tokens[0], "q");
        assert_eq!(tokens[7], "cm");
        assert_eq!(tokens[8], "/Im0");
        let number = |i: usize| tokens[i].parse::<f32>().unwrap();
        let draw = (number(1), number(4), number(5), number(6));

        let xobject_id = page
            .get(b"Resources")
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"XObject")
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"Im0")
            .unwrap()
            .as_reference()
            .unwrap();
        let xobject = doc.get_object(xobject_id).unwrap().as_stream().unwrap();
        assert_eq!(
            xobject.dict.get(b"Filter").unwrap().as_name().unwrap(),
            b"DCTDecode"
        );
        let color_space = xobject
            .dict
            .get(b"ColorSpace")
            .unwrap()
            .as_name()
            .unwrap()
            .to_vec();
        let image = image::load_from_memory(&xobject.content).unwrap();

        pages.push(RenderedPage {
            media_box,
            draw,
            color_space,
            image,
        });
    }

    pages
}

fn a4_portrait(margin: &str) -> ConversionOptions {
    ConversionOptions {
        quality: 90,
        page_format: PageFormat::A4,
        orientation: Orientation::Portrait,
        greyscale: false,
        scale_up: false,
        ..Default::default()
    }
    .with_margin(margin)
    .unwrap()
}

#[tokio::test]
async fn test_three_images_on_a4_portrait() {
    let request = ConversionRequest::new(
        vec![
            create_test_image("landscape.png", 2000, 1500),
            create_test_image("portrait.png", 800, 1200),
            create_test_image("square.png", 4000, 4000),
        ],
        a4_portrait("0.25"),
    );

    let mut progress = Vec::new();
    let conversion = convert(&request, &mut |p: u8| progress.push(p)).await.unwrap();

    assert_eq!(progress, vec![33, 67, 100]);
    assert_eq!(conversion.page_count(), 3);

    let geometry = conversion.geometry;
    assert_eq!(geometry.margin_pt, 18.0);
    assert!((geometry.content_width_pt - (595.28 - 36.0)).abs() < 0.01);
    assert!((geometry.content_height_pt - (841.89 - 36.0)).abs() < 0.01);
    assert_eq!(geometry.content_px, PixelSize::new(2330, 3358));

    // Both smaller images fit at native size; the square is limited by width
    assert_eq!(conversion.pages[0].target_px, PixelSize::new(2000, 1500));
    assert_eq!(conversion.pages[1].target_px, PixelSize::new(800, 1200));
    assert_eq!(conversion.pages[2].target_px, PixelSize::new(2330, 2330));

    let rendered = inspect(&conversion.pdf);
    assert_eq!(rendered.len(), 3);

    let expected_draw = [(480.0, 360.0), (192.0, 288.0), (559.0, 559.0)];
    for (page, (width, height)) in rendered.iter().zip(expected_draw) {
        assert_eq!(page.media_box.0.round(), 595.0);
        assert_eq!(page.media_box.1.round(), 842.0);

        let (w, h, x, y) = page.draw;
        assert_eq!((w, h), (width, height));

        // Centered horizontally within the content box
        let content_center = geometry.margin_pt + geometry.content_width_pt / 2.0;
        assert!((x + w / 2.0 - content_center).abs() < 0.01);

        // Top edge against the top margin
        assert!((y + h - (geometry.page_height_pt - geometry.margin_pt)).abs() < 0.01);
    }

    assert_eq!(rendered[0].image.width(), 2000);
    assert_eq!(rendered[2].image.height(), 2330);
}

#[tokio::test]
async fn test_pages_follow_input_order() {
    let sizes = [(300, 200), (120, 480), (640, 640), (50, 90)];
    let images = sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| create_test_image(&format!("{}.png", i), w, h))
        .collect();
    let request = ConversionRequest::new(images, a4_portrait("0"));

    let conversion = convert(&request, &mut NoProgress).await.unwrap();
    let rendered = inspect(&conversion.pdf);

    assert_eq!(rendered.len(), sizes.len());
    for (page, &(w, h)) in rendered.iter().zip(sizes.iter()) {
        assert_eq!((page.image.width(), page.image.height()), (w, h));
    }
}

#[tokio::test]
async fn test_progress_is_monotonic_and_ends_at_100() {
    for count in [1, 2, 5, 7] {
        let images = (0..count)
            .map(|i| create_test_image(&format!("{}.png", i), 40, 30))
            .collect();
        let request = ConversionRequest::new(images, a4_portrait("0.50"));

        let mut progress = Vec::new();
        convert(&request, &mut |p: u8| progress.push(p)).await.unwrap();

        assert_eq!(progress.len(), count);
        assert!(progress.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(progress.last(), Some(&100));
    }
}

#[tokio::test]
async fn test_greyscale_pages_have_equal_channels() {
    let mut options = a4_portrait("0");
    options.greyscale = true;
    let request = ConversionRequest::new(vec![create_test_image("bands.png", 200, 100)], options);

    let conversion = convert(&request, &mut NoProgress).await.unwrap();
    let rendered = inspect(&conversion.pdf);

    assert_eq!(rendered[0].color_space, b"DeviceGray".to_vec());
    let rgb = rendered[0].image.to_rgb8();
    for pixel in rgb.pixels() {
        let [r, g, b] = pixel.0;
        assert!(r == g && g == b, "pixel {:?} is not grey", pixel);
    }
}

#[tokio::test]
async fn test_colour_pages_use_rgb() {
    let request = ConversionRequest::new(
        vec![create_test_image("bands.png", 200, 100)],
        a4_portrait("0"),
    );

    let conversion = convert(&request, &mut NoProgress).await.unwrap();
    let rendered = inspect(&conversion.pdf);

    assert_eq!(rendered[0].color_space, b"DeviceRGB".to_vec());
    assert_eq!(rendered[0].image.color().channel_count(), 3);
}

#[tokio::test]
async fn test_quality_bounds() {
    for quality in [1, 100] {
        let mut options = a4_portrait("0");
        options.quality = quality;
        let request =
            ConversionRequest::new(vec![create_test_image("q.png", 64, 64)], options);

        let conversion = convert(&request, &mut NoProgress).await.unwrap();
        let rendered = inspect(&conversion.pdf);
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].image.width(), 64);
    }

    for quality in [0, 101] {
        let mut options = a4_portrait("0");
        options.quality = quality;
        let request =
            ConversionRequest::new(vec![create_test_image("q.png", 64, 64)], options);

        let result = convert(&request, &mut NoProgress).await;
        assert!(matches!(result, Err(ConvertError::InvalidParameter(_))));
    }
}

#[tokio::test]
async fn test_empty_input_is_rejected() {
    let request = ConversionRequest::new(Vec::new(), a4_portrait("0"));

    let mut progress = Vec::new();
    let result = convert(&request, &mut |p: u8| progress.push(p)).await;

    assert!(matches!(result, Err(ConvertError::EmptyInput)));
    assert!(progress.is_empty());
}

#[tokio::test]
async fn test_undecodable_image_aborts_conversion() {
    let request = ConversionRequest::new(
        vec![
            create_test_image("good.png", 32, 32),
            ImageSource::new("broken.png", b"\x89PNG but not really".to_vec()),
            create_test_image("never.png", 32, 32),
        ],
        a4_portrait("0"),
    );

    let mut progress = Vec::new();
    let result = convert(&request, &mut |p: u8| progress.push(p)).await;

    match result {
        Err(ConvertError::Decode { name, .. }) => assert_eq!(name, "broken.png"),
        other => panic!("Expected Decode error, got {:?}", other.map(|c| c.page_count())),
    }
    assert_eq!(progress, vec![33]);
}

#[tokio::test]
async fn test_margin_larger_than_page_is_rejected() {
    let options = ConversionOptions {
        page_format: PageFormat::Photo4x6,
        orientation: Orientation::Portrait,
        margin_in: 2.0,
        ..Default::default()
    };
    let request = ConversionRequest::new(vec![create_test_image("a.png", 10, 10)], options);

    let result = convert(&request, &mut NoProgress).await;
    assert!(matches!(result, Err(ConvertError::InvalidParameter(_))));
}

#[tokio::test]
async fn test_repeated_conversion_has_identical_geometry() {
    let request = ConversionRequest::new(
        vec![
            create_test_image("a.png", 900, 300),
            create_test_image("b.png", 3000, 5000),
        ],
        a4_portrait("1.00"),
    );

    let first = convert(&request, &mut NoProgress).await.unwrap();
    let second = convert(&request, &mut NoProgress).await.unwrap();

    assert_eq!(first.geometry, second.geometry);
    assert_eq!(first.pages, second.pages);

    let first_pages = inspect(&first.pdf);
    let second_pages = inspect(&second.pdf);
    assert_eq!(first_pages.len(), second_pages.len());
    for (a, b) in first_pages.iter().zip(second_pages.iter()) {
        assert_eq!(a.media_box, b.media_box);
        assert_eq!(a.draw, b.draw);
    }
}

#[tokio::test]
async fn test_scale_up_fills_content_box() {
    let mut options = a4_portrait("0.25");
    options.scale_up = true;
    let request = ConversionRequest::new(vec![create_test_image("small.png", 300, 150)], options);

    let conversion = convert(&request, &mut NoProgress).await.unwrap();
    let placed = conversion.pages[0];
    let geometry = conversion.geometry;

    // Pixel data is not enlarged; only the draw size is
    assert_eq!(placed.target_px, PixelSize::new(300, 150));
    assert!((placed.rect.width - geometry.content_width_pt).abs() < 0.01);
    assert!((placed.rect.height - geometry.content_width_pt / 2.0).abs() < 0.01);

    let rendered = inspect(&conversion.pdf);
    assert!((rendered[0].draw.0 - geometry.content_width_pt).abs() < 0.01);
}

// The orientation flag swaps width and height unconditionally: it does not
// look at whether the catalog entry is already landscape. These tests pin
// that behaviour down for both a tall and a square format.
#[tokio::test]
async fn test_orientation_flag_swaps_unconditionally() {
    let mut options = a4_portrait("0");
    options.orientation = Orientation::Landscape;
    let request = ConversionRequest::new(vec![create_test_image("a.png", 40, 40)], options);

    let conversion = convert(&request, &mut NoProgress).await.unwrap();
    let rendered = inspect(&conversion.pdf);
    assert_eq!(rendered[0].media_box.0.round(), 842.0);
    assert_eq!(rendered[0].media_box.1.round(), 595.0);

    for orientation in [Orientation::Portrait, Orientation::Landscape] {
        let options = ConversionOptions {
            page_format: PageFormat::Square8x8,
            orientation,
            ..Default::default()
        };
        let request = ConversionRequest::new(vec![create_test_image("a.png", 40, 40)], options);
        let conversion = convert(&request, &mut NoProgress).await.unwrap();
        assert_eq!(conversion.geometry.page_width_pt, 576.0);
        assert_eq!(conversion.geometry.page_height_pt, 576.0);
    }
}

#[tokio::test]
async fn test_cancel_before_start() {
    let request = ConversionRequest::new(vec![create_test_image("a.png", 20, 20)], a4_portrait("0"));
    let cancel = CancelToken::new();
    cancel.cancel();

    let mut progress = Vec::new();
    let result = convert_with_cancel(&request, &mut |p: u8| progress.push(p), &cancel).await;

    assert!(matches!(result, Err(ConvertError::Cancelled)));
    assert!(progress.is_empty());
}

#[tokio::test]
async fn test_cancel_between_images() {
    let request = ConversionRequest::new(
        (0..3)
            .map(|i| create_test_image(&format!("{}.png", i), 20, 20))
            .collect(),
        a4_portrait("0"),
    );
    let cancel = CancelToken::new();
    let trip = cancel.clone();

    let mut progress = Vec::new();
    let result = convert_with_cancel(
        &request,
        &mut |p: u8| {
            progress.push(p);
            trip.cancel();
        },
        &cancel,
    )
    .await;

    assert!(matches!(result, Err(ConvertError::Cancelled)));
    assert_eq!(progress, vec![33]);
}

#[tokio::test]
async fn test_load_images_and_save_pdf() {
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");
    std::fs::write(&first, &create_test_image("x", 30, 20).data[..]).unwrap();
    std::fs::write(&second, &create_test_image("y", 20, 30).data[..]).unwrap();

    let paths = vec![first.clone(), second.clone()];
    let images = load_images(&paths).await.unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].name, "first.png");
    assert_eq!(images[1].name, "second.png");

    let request = ConversionRequest::new(images, a4_portrait("0"));
    let conversion = convert(&request, &mut NoProgress).await.unwrap();

    let output = dir.path().join("out.pdf");
    save_pdf(&conversion.pdf, &output).await.unwrap();

    let loaded = Document::load(&output).unwrap();
    assert_eq!(loaded.get_pages().len(), 2);
}

#[tokio::test]
async fn test_load_missing_image_is_io_error() {
    let result = load_image("/definitely/not/here.png").await;
    assert!(matches!(result, Err(ConvertError::Io(_))));
}

#[tokio::test]
async fn test_exif_orientation_is_applied() {
    let request = ConversionRequest::new(
        vec![create_rotated_jpeg("phone.jpg", 200, 100)],
        a4_portrait("0"),
    );
    let conversion = convert(&request, &mut NoProgress).await.unwrap();

    let page = &conversion.pages[0];
    assert_eq!(page.native_px, PixelSize::new(100, 200));
    assert_eq!(page.target_px, PixelSize::new(100, 200));
    // 100x200 px -> 24x48 pt
    assert_eq!(page.rect.width, 24.0);
    assert_eq!(page.rect.height, 48.0);

    let rendered = inspect(&conversion.pdf);
    assert_eq!(rendered[0].image.width(), 100);
    assert_eq!(rendered[0].image.height(), 200);
}
