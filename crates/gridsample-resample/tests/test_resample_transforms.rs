use std::borrow::Cow;

use approx::assert_relative_eq;
use gridsample_grid::{AffineTransform, Grid, GridSize};
use gridsample_resample::{
    downsample_2d, resample_2d, upsample_2d, upsample_2d_into, Downsampling, ResampleError,
    ResampleOptions, Upsampling,
};

const SRC_SIZE: GridSize = GridSize {
    width: 4,
    height: 4,
};

fn src_grid() -> Grid<f64> {
    let _ = env_logger::builder().is_test(true).try_init();
    Grid::new(
        SRC_SIZE,
        vec![
            0.9, 0.5, 3.0, 4.0, //
            1.1, 1.5, 1.0, 2.0, //
            4.0, 2.1, 3.0, 5.0, //
            3.0, 4.9, 3.0, 1.0,
        ],
    )
    .unwrap()
}

fn src_transform() -> AffineTransform {
    AffineTransform::from((1.0, 0.0, 0.0, 0.0, -1.0, 4.0))
}

fn out_transform() -> AffineTransform {
    AffineTransform::from((1.0, 0.0, 0.5, 0.0, -1.0, 3.5))
}

#[test]
fn downsample_first_with_transforms() {
    let src = src_grid();
    let result = downsample_2d(
        &src,
        2,
        2,
        Downsampling::First,
        Some(&src_transform()),
        Some(&out_transform()),
        &ResampleOptions::default(),
    )
    .unwrap();
    assert_eq!(result.as_slice(), &[0.9, 0.5, 1.1, 1.5]);
}

#[test]
fn downsample_mean_with_transforms() {
    let src = src_grid();
    let result = downsample_2d(
        &src,
        2,
        2,
        Downsampling::Mean,
        Some(&src_transform()),
        Some(&out_transform()),
        &ResampleOptions::default(),
    )
    .unwrap();
    let expected = [
        (0.9 + 0.5 + 1.1 + 1.5) / 4.0,
        (0.5 + 3.0 + 1.5 + 1.0) / 4.0,
        (1.1 + 1.5 + 4.0 + 2.1) / 4.0,
        (1.5 + 1.0 + 2.1 + 3.0) / 4.0,
    ];
    for (got, want) in result.as_slice().iter().zip(expected) {
        assert_relative_eq!(*got, want);
    }
}

#[test]
fn downsample_mean_positive_dy_matches_negative_dy() {
    // flipping both vertical pixel-size signs and origins consistently must
    // not change the numbers
    let src = src_grid();
    let src_t = AffineTransform::from((1.0, 0.0, 0.0, 0.0, 1.0, -4.0));
    let out_t = AffineTransform::from((1.0, 0.0, 0.5, 0.0, 1.0, -3.5));
    let flipped = downsample_2d(
        &src,
        2,
        2,
        Downsampling::Mean,
        Some(&src_t),
        Some(&out_t),
        &ResampleOptions::default(),
    )
    .unwrap();
    let reference = downsample_2d(
        &src,
        2,
        2,
        Downsampling::Mean,
        Some(&src_transform()),
        Some(&out_transform()),
        &ResampleOptions::default(),
    )
    .unwrap();
    assert_eq!(flipped.as_slice(), reference.as_slice());
}

#[test]
fn upsample_nearest_with_transforms() {
    let src = src_grid();
    let out_t = AffineTransform::from((0.75, 0.0, 0.5, 0.0, -0.75, 3.5));
    let result = upsample_2d(
        &src,
        2,
        2,
        Upsampling::Nearest,
        Some(&src_transform()),
        Some(&out_t),
        &ResampleOptions::default(),
    )
    .unwrap();
    assert_eq!(result.as_slice(), &[0.9, 0.5, 1.1, 1.5]);
}

#[test]
fn upsample_equal_shape_zoom_transform() {
    // same shape as the source, but the output covers only its top-left
    // quarter at half the cellsize, so this is not an identity
    let src = src_grid();
    let out_t = AffineTransform::from((0.5, 0.0, 0.0, 0.0, -0.5, 4.0));
    let result = upsample_2d(
        &src,
        4,
        4,
        Upsampling::Nearest,
        Some(&src_transform()),
        Some(&out_t),
        &ResampleOptions::default(),
    )
    .unwrap();
    assert!(matches!(result, Cow::Owned(_)));
    let expected = [
        0.9, 0.9, 0.5, 0.5, //
        0.9, 0.9, 0.5, 0.5, //
        1.1, 1.1, 1.5, 1.5, //
        1.1, 1.1, 1.5, 1.5,
    ];
    assert_eq!(result.as_slice(), &expected);

    // the buffer-writing form must resample rather than copy the source
    let mut dst = Grid::from_size_val(SRC_SIZE, 0.0).unwrap();
    upsample_2d_into(
        &src,
        &mut dst,
        4,
        4,
        Upsampling::Nearest,
        Some(&src_transform()),
        Some(&out_t),
        &ResampleOptions::default(),
    )
    .unwrap();
    assert_eq!(dst.as_slice(), &expected);
}

#[test]
fn upsample_linear_midpoint_with_transforms() {
    let src = Grid::new(
        GridSize {
            width: 2,
            height: 2,
        },
        vec![0.0, 0.0, 1.0, 1.0],
    )
    .unwrap();
    let out_t = AffineTransform::from((0.5, 0.0, 0.5, 0.0, -0.5, 3.5));
    let result = upsample_2d(
        &src,
        2,
        2,
        Upsampling::LinearMidpoint,
        Some(&src_transform()),
        Some(&out_t),
        &ResampleOptions::default(),
    )
    .unwrap();
    assert_eq!(result.as_slice(), &[0.25, 0.25, 0.75, 0.75]);
}

#[test]
fn identity_with_matching_transforms() {
    let src = src_grid();
    let result = upsample_2d(
        &src,
        4,
        4,
        Upsampling::Linear,
        Some(&src_transform()),
        Some(&src_transform()),
        &ResampleOptions::default(),
    )
    .unwrap();
    assert!(matches!(result, Cow::Borrowed(_)));
    assert_eq!(result.as_slice(), src.as_slice());
}

#[test]
fn error_single_transform() {
    let src = src_grid();
    let src_t = src_transform();
    let opts = ResampleOptions::default();

    let result = downsample_2d(&src, 2, 2, Downsampling::Mean, Some(&src_t), None, &opts);
    assert_eq!(result, Err(ResampleError::TransformPairing));

    let result = upsample_2d(&src, 2, 2, Upsampling::Nearest, Some(&src_t), None, &opts);
    assert_eq!(result, Err(ResampleError::TransformPairing));
}

#[test]
fn error_invalid_cellsize() {
    let src = src_grid();
    let opts = ResampleOptions::default();

    // upsampling must not coarsen the resolution
    let coarser = AffineTransform::from((2.0, 0.0, 0.0, 0.0, -2.0, 4.0));
    let result = upsample_2d(
        &src,
        2,
        2,
        Upsampling::Nearest,
        Some(&src_transform()),
        Some(&coarser),
        &opts,
    );
    assert_eq!(result, Err(ResampleError::InvalidCellsize("upsampling")));

    // downsampling must not refine it
    let finer = AffineTransform::from((0.5, 0.0, 0.0, 0.0, -0.5, 4.0));
    let result = downsample_2d(
        &src,
        2,
        2,
        Downsampling::Mean,
        Some(&src_transform()),
        Some(&finer),
        &opts,
    );
    assert_eq!(result, Err(ResampleError::InvalidCellsize("downsampling")));
}

#[test]
fn error_rotated_transform() {
    let src = src_grid();
    let rotated = AffineTransform::from((1.0, 45.0, 0.0, 0.0, -1.0, 4.0));
    let result = downsample_2d(
        &src,
        2,
        2,
        Downsampling::Mean,
        Some(&rotated),
        Some(&out_transform()),
        &ResampleOptions::default(),
    );
    assert_eq!(result, Err(ResampleError::RotatedTransform));
}

#[test]
fn error_pixel_sign_mismatch() {
    let src = src_grid();
    let opts = ResampleOptions::default();

    let negative_dx = AffineTransform::from((-1.0, 0.0, 0.0, 0.0, -1.0, 4.0));
    let result = downsample_2d(
        &src,
        2,
        2,
        Downsampling::Mean,
        Some(&negative_dx),
        Some(&out_transform()),
        &opts,
    );
    assert_eq!(result, Err(ResampleError::IncompatiblePixelSign("widths")));

    let positive_dy = AffineTransform::from((1.0, 0.0, 0.0, 0.0, 1.0, 4.0));
    let result = downsample_2d(
        &src,
        2,
        2,
        Downsampling::Mean,
        Some(&positive_dy),
        Some(&out_transform()),
        &opts,
    );
    assert_eq!(result, Err(ResampleError::IncompatiblePixelSign("heights")));
}

#[test]
fn error_coverage_outside_source() {
    let src = src_grid();
    let opts = ResampleOptions::default();

    // four output columns starting at x = 0.5 reach past the source edge
    let result = downsample_2d(
        &src,
        4,
        2,
        Downsampling::Mean,
        Some(&src_transform()),
        Some(&out_transform()),
        &opts,
    );
    assert_eq!(result, Err(ResampleError::CoverageOutsideSource("x")));

    let result = downsample_2d(
        &src,
        2,
        4,
        Downsampling::Mean,
        Some(&src_transform()),
        Some(&out_transform()),
        &opts,
    );
    assert_eq!(result, Err(ResampleError::CoverageOutsideSource("y")));
}

#[test]
fn std_is_sqrt_of_var_cell_for_cell() {
    let src = src_grid();
    let opts = ResampleOptions::default();
    let var = downsample_2d(&src, 2, 2, Downsampling::Var, None, None, &opts).unwrap();
    let std = downsample_2d(&src, 2, 2, Downsampling::Std, None, None, &opts).unwrap();
    for (v, s) in var.as_slice().iter().zip(std.as_slice()) {
        assert_eq!(*s, v.sqrt());
    }
}

#[test]
fn unified_identity() {
    let src = src_grid();
    let result = resample_2d(
        &src,
        4,
        4,
        Downsampling::Mean,
        Upsampling::Linear,
        &ResampleOptions::default(),
    )
    .unwrap();
    assert!(matches!(result, Cow::Borrowed(_)));
}

#[test]
fn masked_source_all_invalid_footprint() {
    // top-left 2x2 block masked out entirely
    let src = src_grid()
        .with_mask(vec![
            true, true, false, false, //
            true, true, false, false, //
            false, false, false, false, //
            false, false, false, false,
        ])
        .unwrap();
    for method in [
        Downsampling::First,
        Downsampling::Last,
        Downsampling::Mean,
        Downsampling::Mode,
        Downsampling::Var,
        Downsampling::Std,
    ] {
        let result = downsample_2d(
            &src,
            2,
            2,
            method,
            None,
            None,
            &ResampleOptions::default().with_fill_value(-9.0),
        )
        .unwrap();
        assert_eq!(result.get(0, 0), Some(-9.0), "method {method:?}");
        assert!(result.is_masked(), "method {method:?}");
        assert_eq!(result.mask().unwrap()[0], true, "method {method:?}");
    }
}
