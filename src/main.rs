// This file is an example of how to use the `coin_vision` library.
// The main library entry point is `src/lib.rs`.

fn main() {
    println!("Coin Vision Engine - Example Runner");
    // In a real application, you would select a profile, instantiate the
    // pipeline, and feed it frames decoded from a video source here.
    //
    // Example:
    // let profile = coin_vision::VideoProfile::builtin("video1").unwrap();
    // let config = coin_vision::PipelineConfig { image_width: 640, image_height: 480, profile, debug_dump_dir: None };
    // let mut pipeline = coin_vision::CoinPipeline::new(config);
    // let frame = decode_next_bgr_frame();
    // let report = pipeline.process_frame(&frame)?;
    // println!("tally: {:?}", report.summary);
}
