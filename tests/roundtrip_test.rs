use image::RgbImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lsb_stego::common::config::OutputConfig;
use lsb_stego::imaging::{self, compare};
use lsb_stego::processing::{bitcodec, framer, pipeline};
use lsb_stego::StegoError;

fn noise(rng: &mut StdRng, width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |_, _| image::Rgb(rng.gen()))
}

#[tokio::test]
async fn test_roundtrip_through_png_files() {
    let mut rng = StdRng::seed_from_u64(2024);
    let dir = tempfile::tempdir().unwrap();
    let output = OutputConfig {
        directory: dir.path().display().to_string(),
        ..OutputConfig::default()
    };

    let hidden = vec![noise(&mut rng, 24, 16), noise(&mut rng, 13, 9)];
    let carriers = vec![
        noise(&mut rng, 30, 20),
        noise(&mut rng, 32, 32),
        noise(&mut rng, 64, 48),
    ];

    let encoded = pipeline::encode_concurrent(carriers.clone(), hidden.clone(), 2)
        .await
        .unwrap();

    let mut paths = Vec::new();
    for (index, img) in encoded.iter().enumerate() {
        let path = output.encoded_path(index);
        imaging::save_image(img, &path).unwrap();
        paths.push(path);
    }

    let reloaded = imaging::load_all(&paths).unwrap();
    assert_eq!(reloaded, encoded);

    let recovered = pipeline::decode_concurrent(reloaded, 2).await.unwrap();
    assert_eq!(recovered, hidden);
}

#[test]
fn test_payload_spans_every_carrier() {
    let mut rng = StdRng::seed_from_u64(5);
    let hidden = vec![noise(&mut rng, 20, 20)];
    let carriers = vec![noise(&mut rng, 40, 40), noise(&mut rng, 40, 40), noise(&mut rng, 30, 30)];

    let stream_len = framer::serialized_len(&hidden);
    let capacities = pipeline::capacities(&carriers);
    assert!(capacities[0] + capacities[1] < stream_len);

    let encoded = pipeline::encode(&carriers, &hidden).unwrap();
    for (enc, orig) in encoded.iter().zip(&carriers) {
        assert_ne!(enc, orig);
        let quality = compare(orig, enc).unwrap();
        assert!(quality.mse <= 1.0);
    }

    assert_eq!(pipeline::decode(&encoded).unwrap(), hidden);
}

#[test]
fn test_carrier_capacity_boundary() {
    // 10x9 carrier: 270 channel values, 30 payload bytes
    let carrier = RgbImage::from_pixel(10, 9, image::Rgb([128, 64, 32]));
    assert_eq!(bitcodec::capacity(10, 9), 30);

    // "1x5$$IMG0$$" (11) + 15 pixel bytes + "$$END$$" (7) = 33 bytes: too big
    let too_big = vec![RgbImage::from_pixel(1, 5, image::Rgb([1, 2, 3]))];
    let err = pipeline::encode(&[carrier.clone()], &too_big).unwrap_err();
    assert!(matches!(err, StegoError::Capacity { .. }));
    assert_eq!(err.shortfall(), Some(3));

    // 11 + 12 + 7 = 30 bytes: exact fit
    let exact = vec![RgbImage::from_pixel(1, 4, image::Rgb([1, 2, 3]))];
    let encoded = pipeline::encode(&[carrier], &exact).unwrap();
    assert_eq!(pipeline::decode(&encoded).unwrap(), exact);
}

#[test]
fn test_clean_carrier_is_rejected() {
    let carrier = RgbImage::from_pixel(12, 12, image::Rgb([2, 4, 6]));
    assert!(matches!(
        pipeline::decode(&[carrier]),
        Err(StegoError::Format { .. })
    ));
}
