//! Upload da planilha de vendas e status da base carregada.

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Responder};
use futures_util::stream::StreamExt;
use serde_json::json;
use tokio::io::AsyncWriteExt;

use crate::excel::cache::carregar_base_principal;
use crate::excel::{ARQUIVO_UPLOAD, diretorio_dados, localizar_base};

use super::sessao::{autenticado, resposta_nao_autenticado};

/// POST /upload
/// Recebe um único .xlsx via multipart e o grava como a base enviada,
/// que passa a ter prioridade sobre as demais planilhas do diretório.
pub async fn upload_handler(req: HttpRequest, mut payload: Multipart) -> impl Responder {
    if !autenticado(&req) {
        return resposta_nao_autenticado();
    }

    let dir = diretorio_dados();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        return HttpResponse::InternalServerError()
            .json(json!({"error": format!("Falha ao criar o diretório de dados: {}", e)}));
    }
    let destino = dir.join(ARQUIVO_UPLOAD);

    let mut gravado = false;
    while let Some(field_res) = payload.next().await {
        match field_res {
            Ok(mut field) => {
                let nome = field
                    .content_disposition()
                    .get_filename()
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                if !nome.to_lowercase().ends_with(".xlsx") {
                    continue;
                }

                let mut arquivo = match tokio::fs::File::create(&destino).await {
                    Ok(f) => f,
                    Err(e) => {
                        return HttpResponse::InternalServerError().json(
                            json!({"error": format!("Falha ao criar o arquivo enviado: {}", e)}),
                        );
                    }
                };
                while let Some(chunk) = field.next().await {
                    match chunk {
                        Ok(bytes) => {
                            if let Err(e) = arquivo.write_all(&bytes).await {
                                eprintln!("Falha ao gravar trecho do upload: {}", e);
                                break;
                            }
                        }
                        Err(e) => {
                            eprintln!("Erro no stream do upload: {}", e);
                            break;
                        }
                    }
                }
                gravado = true;
            }
            Err(e) => {
                eprintln!("Erro no campo multipart: {}", e);
            }
        }
    }

    if !gravado {
        return HttpResponse::BadRequest()
            .json(json!({"error": "Nenhum arquivo .xlsx foi enviado."}));
    }
    HttpResponse::Ok().json(json!({"status": "ok", "arquivo": ARQUIVO_UPLOAD}))
}

/// GET /status
/// Informa qual base está ativa, quantos registros tem e quando foi lida.
pub async fn status_handler(req: HttpRequest) -> impl Responder {
    if !autenticado(&req) {
        return resposta_nao_autenticado();
    }
    let caminho = match localizar_base() {
        Some(p) => p,
        None => {
            return HttpResponse::Ok().json(json!({
                "base_carregada": false,
                "aviso": "Nenhuma base de dados encontrada. Envie a planilha de vendas (.xlsx).",
            }));
        }
    };
    match carregar_base_principal() {
        Ok((registros, atualizado_em)) => HttpResponse::Ok().json(json!({
            "base_carregada": true,
            "arquivo": caminho.file_name().and_then(|n| n.to_str()),
            "registros": registros.len(),
            "atualizado_em": atualizado_em,
        })),
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({"error": format!("Falha ao carregar a base: {}", e)})),
    }
}
