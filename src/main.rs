use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use step_checker::{cli, config, editor, finisher, images, loader, logging, patcher, review};
use cli::{Cli, Commands};
use config::Config;
use patcher::PatchOutcome;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("設定ファイルを読み込めません")?;
    let logging_handle = logging::init_logging(&config, cli.verbose)?;
    if let Some(notice) = logging_handle.file_notice() {
        eprintln!("{}", notice);
    }

    match cli.command {
        Commands::Load { folder, json } => {
            let load = loader::load_folder(&folder)
                .with_context(|| format!("load {}", folder.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&load)?);
                return Ok(());
            }

            println!("📂 {}", load.path.display());
            println!("進捗: {} 完了", load.progress);

            if load.json_files.is_empty() {
                println!("JSONファイルがありません");
            }

            for file in &load.json_files {
                match file.document() {
                    Some(doc) => println!(
                        "✔ {} (ステップ {}件){}",
                        doc.name,
                        doc.steps().len(),
                        doc.instruction().map(|i| format!(": {}", i)).unwrap_or_default()
                    ),
                    None => println!("✘ {}: {}", file.name(), file.error().unwrap_or_default()),
                }
            }
        }

        Commands::Steps { folder } => {
            let load = loader::load_folder(&folder)
                .with_context(|| format!("load {}", folder.display()))?;

            for doc in load.documents() {
                println!("[{}] {}", doc.name, doc.instruction().unwrap_or("(指示文なし)"));
                for step in doc.steps() {
                    println!(
                        "  {}: {}",
                        step.label(),
                        step.low_level_instruction.as_deref().unwrap_or("-")
                    );
                }
            }

            let audit = images::audit_images(&folder, &load.step_ids(), &config.image_extension)?;
            println!("\n画像: {}件あり", audit.present.len());
            if !audit.missing.is_empty() {
                let missing: Vec<String> = audit.missing.iter().map(ToString::to_string).collect();
                println!("⚠ 画像なしのステップ: {}", missing.join(", "));
            }
            if !audit.orphaned.is_empty() {
                println!("⚠ 対応するステップのない画像: {}", audit.orphaned.join(", "));
            }
        }

        Commands::Patch { folder, step_id, instruction } => {
            let outcome = patcher::patch_step(&folder, &step_id, &instruction)
                .inspect_err(|e| tracing::error!("指示文を更新できません: {}", e))
                .with_context(|| format!("patch {} step_id={}", folder.display(), step_id))?;

            match outcome {
                PatchOutcome::Updated { file, step_index } => {
                    println!("✔ 更新: {} (steps[{}])", file.display(), step_index);
                }
                PatchOutcome::NotFound => {
                    println!("step_id={} は見つかりませんでした（変更なし）", step_id);
                }
            }
        }

        Commands::Finish { folder } => {
            let new_path = finisher::mark_finished(&folder)
                .inspect_err(|e| tracing::error!("完了にできません: {}", e))
                .with_context(|| format!("finish {}", folder.display()))?;
            println!("{}", new_path.display());
        }

        Commands::Progress { path, root } => {
            let progress = if root {
                loader::progress::count_entries(&path)?
            } else {
                loader::progress::count_progress(&path)
            };
            println!(
                "{} 完了 (残り {}, {:.1}%)",
                progress,
                progress.remaining(),
                progress.ratio() * 100.0
            );
        }

        Commands::Edit { folder } => {
            let summary = editor::run_interactive_editor(folder, &config)?;
            println!("\n更新 {}件 / スキップ {}件", summary.updated, summary.skipped);
        }

        Commands::Review { checked, reference, details } => {
            let reference = match reference {
                Some(dir) => dir,
                None => config.get_reference_dir()?,
            };

            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );

            let report = review::review_finished_with(&checked, &reference, |done, total, item| {
                pb.set_length(total as u64);
                pb.set_position(done as u64);
                pb.set_message(item.folder.clone());
            })
            .with_context(|| format!("review {}", checked.display()))?;
            pb.finish_and_clear();

            for item in &report.items {
                if let Some(error) = &item.error {
                    println!("✘ {}: {}", item.folder, error);
                    continue;
                }
                for file in &item.files {
                    if let Some(error) = &file.error {
                        println!("✘ {}/{}: {}", item.folder, file.name, error);
                    } else if file.differences.is_empty() {
                        println!("  {}/{}: 差分なし", item.folder, file.name);
                    } else {
                        println!("≠ {}/{}: 差分 {}件", item.folder, file.name, file.differences.len());
                        if details {
                            for diff in &file.differences {
                                println!("    {}", diff);
                            }
                        }
                    }
                }
            }

            println!(
                "\n{} / {} フォルダに差分あり（エラー {}件）",
                report.differing(),
                report.total(),
                report.errors()
            );
        }

        Commands::Config { set_reference, set_log_level, show } => {
            let mut config = config;

            if let Some(dir) = set_reference {
                config.set_reference_dir(dir)?;
                println!("✔ 参照データセットを設定しました");
            }

            if let Some(level) = set_log_level {
                config.set_log_level(level)?;
                println!("✔ ログレベルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  パス: {}", Config::config_path()?.display());
                println!(
                    "  参照データセット: {}",
                    config
                        .reference_dir
                        .as_ref()
                        .map(|d| d.display().to_string())
                        .unwrap_or_else(|| "未設定".into())
                );
                println!("  画像拡張子: {}", config.image_extension);
                println!("  ログレベル: {}", config.logging.level);
                println!("  ファイル出力: {}", if config.logging.to_file { "有効" } else { "無効" });
            }
        }
    }

    Ok(())
}
