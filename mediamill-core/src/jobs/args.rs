//! Argument-list construction for each job kind.
//!
//! The engine consumes a traditional transcoder argument vector; these
//! builders produce the exact token sequence for each operation, over
//! bare slot names inside the engine's namespace.

/// Plain transcode: the engine selects codecs from the output extension.
pub(crate) fn convert_args(input: &str, output: &str) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.to_string(),
        output.to_string(),
    ]
}

/// Keeps the [start, end) range. `-to` is the absolute end timestamp, not
/// a duration. Re-encodes rather than stream-copying so arbitrary cut
/// points do not land between keyframes.
pub(crate) fn cut_args(input: &str, start_secs: f64, end_secs: f64, output: &str) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.to_string(),
        "-ss".to_string(),
        format_seconds(start_secs),
        "-to".to_string(),
        format_seconds(end_secs),
        output.to_string(),
    ]
}

/// Concatenates the files listed in the staged manifest.
pub(crate) fn join_args(manifest: &str, output: &str) -> Vec<String> {
    vec![
        "-f".to_string(),
        "concat".to_string(),
        "-safe".to_string(),
        "0".to_string(),
        "-i".to_string(),
        manifest.to_string(),
        output.to_string(),
    ]
}

/// Muxes a video stream and an audio stream together without re-encoding.
pub(crate) fn merge_args(video: &str, audio: &str, output: &str) -> Vec<String> {
    vec![
        "-i".to_string(),
        video.to_string(),
        "-i".to_string(),
        audio.to_string(),
        "-c".to_string(),
        "copy".to_string(),
        output.to_string(),
    ]
}

/// Concat manifest: one `file '<name>'` line per input, in selection order.
pub(crate) fn concat_manifest<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names
        .into_iter()
        .map(|name| format!("file '{name}'\n"))
        .collect()
}

fn format_seconds(secs: f64) -> String {
    if secs.fract() == 0.0 {
        format!("{}", secs as i64)
    } else {
        secs.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_pair(args: &[String], pair: [&str; 2]) -> bool {
        args.windows(2).any(|w| w[0] == pair[0] && w[1] == pair[1])
    }

    #[test]
    fn test_convert_args_shape() {
        let args = convert_args("in_0_abc.wav", "out_1_def.mp3");
        assert_eq!(args, ["-i", "in_0_abc.wav", "out_1_def.mp3"]);
    }

    #[test]
    fn test_cut_args_carry_absolute_bounds() {
        let args = cut_args("in_0_abc.mp3", 5.0, 15.0, "out_1_def.mp3");
        assert!(has_pair(&args, ["-ss", "5"]));
        assert!(has_pair(&args, ["-to", "15"]));
        assert_eq!(args.last().unwrap(), "out_1_def.mp3");
    }

    #[test]
    fn test_cut_args_keep_fractional_bounds() {
        let args = cut_args("a.mp3", 1.5, 12.25, "b.mp3");
        assert!(has_pair(&args, ["-ss", "1.5"]));
        assert!(has_pair(&args, ["-to", "12.25"]));
    }

    #[test]
    fn test_cut_re_encodes_instead_of_stream_copying() {
        let args = cut_args("a.mp3", 5.0, 15.0, "b.mp3");
        assert!(!has_pair(&args, ["-c", "copy"]));
    }

    #[test]
    fn test_join_args_use_concat_demuxer() {
        let args = join_args("list_2_ghi.txt", "out_3_jkl.mp3");
        assert_eq!(
            args,
            ["-f", "concat", "-safe", "0", "-i", "list_2_ghi.txt", "out_3_jkl.mp3"]
        );
    }

    #[test]
    fn test_merge_args_stream_copy_both_inputs() {
        let args = merge_args("in_0_v.mp4", "in_1_a.mp3", "out_2_m.mp4");
        assert_eq!(
            args,
            ["-i", "in_0_v.mp4", "-i", "in_1_a.mp3", "-c", "copy", "out_2_m.mp4"]
        );
    }

    #[test]
    fn test_manifest_preserves_selection_order() {
        let manifest = concat_manifest(["a_staged.mp3", "b_staged.mp3"]);
        assert_eq!(manifest, "file 'a_staged.mp3'\nfile 'b_staged.mp3'\n");

        let swapped = concat_manifest(["b_staged.mp3", "a_staged.mp3"]);
        assert_eq!(swapped, "file 'b_staged.mp3'\nfile 'a_staged.mp3'\n");
    }
}
