use timetable_share_lib::domain::models::Document;

pub fn show_document_debug_data(document: &Document) {
    println!("\n=======================================================");
    println!("🗓️ [DEBUG] {} (template: {})", document.meta.title, document.meta.template_id);
    println!("=======================================================");

    // 曜日の表示用ラベル (0=Mon ~ 6=Sun に対応)
    let day_labels = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

    for &day in &document.meta.active_days {
        let label = day_labels.get(day as usize).unwrap_or(&"???");
        println!("📅 [{}] ------------------------------------------", label);

        for period in 1..=document.meta.period_count {
            let time = document
                .effective_time(day, period)
                .map(|t| format!("{}-{}", t.start, t.end))
                .unwrap_or_default();
            let cell = document.cell(day, period).unwrap();

            let subject = if cell.subject.is_empty() {
                "(なし)".to_string()
            } else {
                cell.subject.clone()
            };

            let merged = match document.merge_covering(day, period) {
                Some((start, span)) => format!(" [結合 {}限+{}]", start, span),
                None => String::new(),
            };

            println!(
                "   {}限 {:<11} : {:<15} {} {} {}{}",
                period, time, subject, cell.teacher, cell.room, cell.color, merged
            );
        }
    }
    println!("=======================================================\n");
}
