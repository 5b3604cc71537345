use image::{DynamicImage, Rgb, RgbImage};

/// White canvas with a black square in the top-left quadrant.
fn white_with_black_square(width: u32, height: u32, square: u32) -> DynamicImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    let offset = square / 2;
    for y in offset..offset + square {
        for x in offset..offset + square {
            img.put_pixel(x, y, Rgb([0, 0, 0]));
        }
    }
    DynamicImage::ImageRgb8(img)
}
