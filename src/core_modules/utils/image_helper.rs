mod image_helper {
    use image::ImageEncoder;

    use crate::core_modules::image::Image;

    /// Writes a 1-channel stage buffer to disk as an 8-bit grayscale PNG.
    /// Used by the pipeline's debug dump and by tests that want to eyeball
    /// intermediate stages.
    pub fn save_gray(
        path: &std::path::Path,
        img: &Image,
    ) -> Result<(), image::error::ImageError> {
        let output = std::fs::File::create(path)?;
        let encoder = image::codecs::png::PngEncoder::new(output);

        encoder.write_image(
            img.data(),
            img.width() as u32,
            img.height() as u32,
            image::ExtendedColorType::L8,
        )?;

        Ok(())
    }
}

pub use image_helper::save_gray;

#[cfg(test)]
mod tests {
    use super::save_gray;
    use crate::core_modules::image::{Image, LEVELS_8BIT};

    #[test]
    fn save_gradient_file() {
        let mut img = Image::new(64, 64, 1, LEVELS_8BIT).unwrap();
        let mut intensity = 0u8;
        for v in img.data_mut() {
            *v = intensity;
            intensity = intensity.wrapping_add(1);
        }

        let path = std::env::temp_dir().join("coin_vision_gradient.png");
        save_gray(&path, &img).expect("Error Saving File.");
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }
}
