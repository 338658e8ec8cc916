//! Report export tools
//!
//! Render a day's nutrition assessment as plain text or as a PDF with a
//! percentage chart. PDF output uses builtin Helvetica, so it sticks to
//! ASCII identifiers; the text export carries the localized wording.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::image_crate::{DynamicImage, ImageFormat, RgbImage};
use printpdf::*;
use serde::Serialize;

use crate::db::Database;
use crate::models::DaySelection;
use crate::nutrition::{
    export_report_to_text, generate_nutrition_overview, NutrientAssessment, NutrientKey,
    NutritionAssessor, NutritionStatus, ReportOptions,
};

// ============================================================================
// Color Constants (RGB 0-255)
// ============================================================================

const COLOR_TITLE: (u8, u8, u8) = (5, 150, 105); // Green for report title
const COLOR_DEFICIENT: (u8, u8, u8) = (239, 68, 68); // Red
const COLOR_INSUFFICIENT: (u8, u8, u8) = (245, 158, 11); // Amber
const COLOR_ADEQUATE: (u8, u8, u8) = (16, 185, 129); // Green
const COLOR_EXCESSIVE: (u8, u8, u8) = (59, 130, 246); // Blue
const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_GRAY: (u8, u8, u8) = (128, 128, 128);

fn status_color(status: NutritionStatus) -> (u8, u8, u8) {
    match status {
        NutritionStatus::Deficient => COLOR_DEFICIENT,
        NutritionStatus::Insufficient => COLOR_INSUFFICIENT,
        NutritionStatus::Adequate => COLOR_ADEQUATE,
        NutritionStatus::Excessive => COLOR_EXCESSIVE,
    }
}

fn status_label(status: NutritionStatus) -> &'static str {
    match status {
        NutritionStatus::Deficient => "Deficient",
        NutritionStatus::Insufficient => "Insufficient",
        NutritionStatus::Adequate => "Adequate",
        NutritionStatus::Excessive => "Excessive",
    }
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GeneratePdfResponse {
    pub success: bool,
    pub file_path: String,
    pub day: String,
    pub meal_count: usize,
    pub total_nutrients: usize,
    pub overall_status: NutritionStatus,
    pub message: String,
}

// ============================================================================
// Text Export
// ============================================================================

/// Render a day's assessment with the fixed plain-text layout
pub fn export_day_report_text(
    db: &Database,
    assessor: &NutritionAssessor,
    day: &str,
    options: &ReportOptions,
) -> Result<String, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let meals = DaySelection::meals_for_day(&conn, day)
        .map_err(|e| format!("Failed to load selected meals: {}", e))?;

    let report = assessor.generate_nutrition_report(&meals, options);
    Ok(export_report_to_text(&report))
}

// ============================================================================
// Chart Generation (plotters)
// ============================================================================

/// Render the per-nutrient intake percentages as a bar chart PNG
pub fn generate_percentage_chart(
    assessments: &BTreeMap<NutrientKey, NutrientAssessment>,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, String> {
    use plotters::prelude::*;

    if assessments.is_empty() {
        return Err("No data to chart".to_string());
    }

    let rows: Vec<(&'static str, f64, (u8, u8, u8))> = assessments
        .iter()
        .map(|(key, assessment)| {
            (key.as_str(), assessment.percentage, status_color(assessment.status))
        })
        .collect();

    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        // Keep the chart readable when one nutrient is far over target,
        // and always show the 120% band line
        let y_max = rows
            .iter()
            .map(|(_, pct, _)| *pct)
            .fold(f64::NEG_INFINITY, f64::max)
            .min(300.0)
            .max(130.0)
            + 20.0;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(50)
            .build_cartesian_2d(0..(rows.len() as i32), 0.0..y_max)
            .map_err(|e| e.to_string())?;

        chart.configure_mesh()
            .x_labels(rows.len())
            .x_label_formatter(&|x| {
                if *x >= 0 && (*x as usize) < rows.len() {
                    rows[*x as usize].0.to_string()
                } else {
                    String::new()
                }
            })
            .y_desc("% of daily value")
            .draw()
            .map_err(|e| e.to_string())?;

        // Band boundaries
        for (threshold, color) in [
            (60.0, COLOR_DEFICIENT),
            (80.0, COLOR_INSUFFICIENT),
            (120.0, COLOR_EXCESSIVE),
        ] {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(0, threshold), (rows.len() as i32, threshold)],
                ShapeStyle::from(&RGBColor(color.0, color.1, color.2).mix(0.5)).stroke_width(1),
            ))).map_err(|e| e.to_string())?;
        }

        // One bar per nutrient, colored by its status band
        for (i, (_, percentage, color)) in rows.iter().enumerate() {
            let bar_color = RGBColor(color.0, color.1, color.2);
            let top = percentage.min(y_max);
            chart.draw_series(std::iter::once(Rectangle::new(
                [(i as i32, 0.0), (i as i32 + 1, top)],
                bar_color.mix(0.6).filled(),
            ))).map_err(|e| e.to_string())?;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(i as i32, 0.0), (i as i32 + 1, top)],
                bar_color.stroke_width(1),
            ))).map_err(|e| e.to_string())?;
        }

        root.present().map_err(|e| e.to_string())?;
    }

    // Convert RGB buffer to PNG
    let img = RgbImage::from_raw(width, height, buffer)
        .ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    let dyn_img = DynamicImage::ImageRgb8(img);
    dyn_img.write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(png_bytes)
}

// ============================================================================
// PDF Generation Helper Functions
// ============================================================================

fn rgb_to_printpdf(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn add_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    x: Mm,
    y: Mm,
    size: f32,
    color: (u8, u8, u8),
) {
    layer.set_fill_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.use_text(text, size, x, y, font);
}

fn add_line(
    layer: &PdfLayerReference,
    x1: Mm,
    y1: Mm,
    x2: Mm,
    y2: Mm,
    color: (u8, u8, u8),
    width: f32,
) {
    layer.set_outline_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.set_outline_thickness(width);

    let line = Line {
        points: vec![
            (Point::new(x1, y1), false),
            (Point::new(x2, y2), false),
        ],
        is_closed: false,
    };
    layer.add_line(line);
}

// ============================================================================
// Assessment PDF Generation
// ============================================================================

/// Generate a nutrition assessment PDF for a day's selected meals
pub fn generate_assessment_pdf(
    db: &Database,
    assessor: &NutritionAssessor,
    day: &str,
    output_path: &str,
) -> Result<GeneratePdfResponse, String> {
    let conn = db.get_conn().map_err(|e| e.to_string())?;
    let meals = DaySelection::meals_for_day(&conn, day).map_err(|e| e.to_string())?;
    drop(conn);

    let overview = generate_nutrition_overview(&meals);
    let detailed = assessor.assess_all_nutrient_status_with_details(&overview.total_intake);
    let summary = assessor.generate_summary(&detailed);
    let statistics = assessor.generate_statistics(&detailed, &overview);

    // Create PDF - Page 1 Portrait
    let (doc, page1, layer1) = PdfDocument::new(
        "Nutrition Assessment Report",
        Mm(215.9),  // Letter width
        Mm(279.4),  // Letter height
        "Layer 1",
    );

    let font = doc.add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| e.to_string())?;
    let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| e.to_string())?;

    let layer = doc.get_page(page1).get_layer(layer1);

    // Page 1 dimensions (Portrait)
    let page_height = 279.4;
    let margin_left = 15.0;
    let mut y = page_height - 20.0;

    // Title
    add_text(&layer, &font_bold, "Nutrition Assessment Report", Mm(margin_left), Mm(y), 18.0, COLOR_TITLE);
    y -= 10.0;

    // Report metadata
    add_text(&layer, &font, &format!("Day: {}", day), Mm(margin_left), Mm(y), 11.0, COLOR_BLACK);
    let now = chrono::Local::now().format("%Y-%m-%d").to_string();
    add_text(&layer, &font, &format!("Generated: {}", now), Mm(120.0), Mm(y), 11.0, COLOR_BLACK);
    y -= 6.0;

    add_text(&layer, &font, &format!("Meals Selected: {}", overview.meal_count), Mm(margin_left), Mm(y), 11.0, COLOR_BLACK);
    add_text(&layer, &font, &format!("Total Energy: {:.0} kcal", overview.total_energy), Mm(120.0), Mm(y), 11.0, COLOR_BLACK);
    y -= 10.0;

    // Horizontal line
    add_line(&layer, Mm(margin_left), Mm(y), Mm(200.0), Mm(y), COLOR_GRAY, 0.5);
    y -= 8.0;

    // Summary section
    add_text(&layer, &font_bold, "Summary", Mm(margin_left), Mm(y), 12.0, COLOR_BLACK);
    y -= 7.0;

    add_text(&layer, &font, &format!("Nutrients Assessed: {}", summary.total_nutrients), Mm(margin_left), Mm(y), 10.0, COLOR_BLACK);
    add_text(
        &layer,
        &font,
        &format!("Overall Status: {}", status_label(summary.overall_status)),
        Mm(80.0),
        Mm(y),
        10.0,
        status_color(summary.overall_status),
    );
    add_text(&layer, &font, &format!("Health Score: {}", statistics.health_score), Mm(150.0), Mm(y), 10.0, COLOR_BLACK);
    y -= 6.0;

    add_text(
        &layer,
        &font,
        &format!(
            "Average Intake: {:.1}%   Median Intake: {:.1}%",
            statistics.average_intake_percentage, statistics.median_intake_percentage
        ),
        Mm(margin_left),
        Mm(y),
        10.0,
        COLOR_BLACK,
    );
    y -= 6.0;

    let mut col_x = margin_left;
    for (status, count) in &summary.status_counts {
        add_text(
            &layer,
            &font,
            &format!("{}: {}", status_label(*status), count),
            Mm(col_x),
            Mm(y),
            10.0,
            status_color(*status),
        );
        col_x += 45.0;
    }
    y -= 12.0;

    // Per-nutrient table
    add_text(&layer, &font_bold, "Nutrient Detail", Mm(margin_left), Mm(y), 12.0, COLOR_BLACK);
    y -= 7.0;

    let col_widths = [40.0, 28.0, 28.0, 16.0, 28.0, 30.0];
    let headers = ["Nutrient", "Intake", "Standard", "Unit", "Percent", "Status"];

    let mut col_x = margin_left;
    for (i, header) in headers.iter().enumerate() {
        add_text(&layer, &font_bold, header, Mm(col_x), Mm(y), 9.0, COLOR_BLACK);
        col_x += col_widths[i];
    }
    y -= 5.0;

    for (key, assessment) in &detailed {
        col_x = margin_left;
        let row_color = status_color(assessment.status);

        let values = [
            key.as_str().to_string(),
            format!("{:.1}", assessment.intake),
            format!("{:.1}", assessment.standard),
            assessment.unit.to_string(),
            format!("{:.1}%", assessment.percentage),
            status_label(assessment.status).to_string(),
        ];

        for (i, value) in values.iter().enumerate() {
            let color = if i >= 4 { row_color } else { COLOR_BLACK };
            add_text(&layer, &font, value, Mm(col_x), Mm(y), 8.0, color);
            col_x += col_widths[i];
        }
        y -= 4.5;
    }

    // ========================================================================
    // Page 2 - Landscape for Chart
    // ========================================================================
    let (page2, layer2) = doc.add_page(Mm(279.4), Mm(215.9), "Chart Page");  // Landscape
    let layer2 = doc.get_page(page2).get_layer(layer2);

    let landscape_height = 215.9;
    let margin_left_p2 = 15.0;
    let mut y2 = landscape_height - 20.0;

    // Chart title
    add_text(&layer2, &font_bold, "Intake vs Daily Standard", Mm(margin_left_p2), Mm(y2), 16.0, COLOR_TITLE);
    add_text(&layer2, &font, &format!("Day: {}", day), Mm(120.0), Mm(y2), 11.0, COLOR_BLACK);
    y2 -= 10.0;

    // Generate and embed chart (larger for landscape)
    match generate_percentage_chart(&detailed, 1000, 400) {
        Ok(png_bytes) => {
            let dynamic_image = printpdf::image_crate::load_from_memory(&png_bytes)
                .map_err(|e| e.to_string())?;
            let pdf_image = Image::from_dynamic_image(&dynamic_image);

            // 1000x400 pixels at 120 DPI = ~212mm x 85mm - fits well on landscape
            let transform = ImageTransform {
                translate_x: Some(Mm(margin_left_p2)),
                translate_y: Some(Mm(y2 - 90.0)),
                dpi: Some(120.0),
                ..Default::default()
            };

            pdf_image.add_to_layer(layer2.clone(), transform);
            y2 -= 95.0;
        }
        Err(e) => {
            add_text(&layer2, &font, &format!("Chart generation error: {}", e), Mm(margin_left_p2), Mm(y2 - 10.0), 9.0, COLOR_DEFICIENT);
            y2 -= 15.0;
        }
    }

    // Legend
    y2 -= 5.0;
    add_text(&layer2, &font_bold, "Legend:", Mm(margin_left_p2), Mm(y2), 10.0, COLOR_BLACK);
    add_text(&layer2, &font, "Deficient (<60%)", Mm(45.0), Mm(y2), 10.0, COLOR_DEFICIENT);
    add_text(&layer2, &font, "Insufficient (60-79%)", Mm(95.0), Mm(y2), 10.0, COLOR_INSUFFICIENT);
    add_text(&layer2, &font, "Adequate (80-120%)", Mm(155.0), Mm(y2), 10.0, COLOR_ADEQUATE);
    add_text(&layer2, &font, "Excessive (>120%)", Mm(215.0), Mm(y2), 10.0, COLOR_EXCESSIVE);

    // Save PDF
    let path = Path::new(output_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }

    let file = File::create(path).map_err(|e| e.to_string())?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer).map_err(|e| e.to_string())?;

    Ok(GeneratePdfResponse {
        success: true,
        file_path: output_path.to_string(),
        day: day.to_string(),
        meal_count: overview.meal_count,
        total_nutrients: summary.total_nutrients,
        overall_status: summary.overall_status,
        message: format!(
            "Assessment report generated for {} from {} selected meals",
            day, overview.meal_count
        ),
    })
}
