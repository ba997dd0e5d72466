//! Cache simples em memória para a base de vendas normalizada.
//!
//! A base é lida e normalizada uma vez e reaproveitada entre requisições;
//! só é recarregada quando o mtime do arquivo de origem muda.

use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::models::RegistroVenda;

struct BaseCacheada {
    caminho: PathBuf,
    mtime: SystemTime,
    registros: Arc<Vec<RegistroVenda>>,
    ultima_atualizacao: String,
}

static BASE_CACHE: OnceLock<Mutex<Option<BaseCacheada>>> = OnceLock::new();

/// Devolve a base de vendas normalizada e o rótulo de "última atualização".
///
/// Notas:
/// - a chave de validade é (caminho resolvido, mtime): trocar o arquivo ou
///   regravá-lo invalida a entrada na próxima requisição;
/// - o resultado é devolvido como `Arc` para compartilhar entre handlers sem
///   clonagens custosas; o Mutex é mantido por pouco tempo.
pub fn carregar_base_principal() -> Result<(Arc<Vec<RegistroVenda>>, String), Box<dyn Error>> {
    let caminho = crate::excel::localizar_base()
        .ok_or("Nenhuma base de dados encontrada. Envie a planilha de vendas (.xlsx).")?;
    let mtime = std::fs::metadata(&caminho)?.modified()?;

    let cache = BASE_CACHE.get_or_init(|| Mutex::new(None));

    // Primeira tentativa: devolver do cache se caminho e mtime batem
    {
        let guard = cache.lock().expect("mutex do cache da base envenenado");
        if let Some(existente) = guard.as_ref() {
            if existente.caminho == caminho && existente.mtime == mtime {
                return Ok((
                    Arc::clone(&existente.registros),
                    existente.ultima_atualizacao.clone(),
                ));
            }
        }
    }

    // Fora do lock: ler e normalizar (operação custosa)
    let bruta = crate::excel::ler_tabela_bruta(&caminho, None)?;
    let registros = crate::normalizar::normalizar_base(&bruta)?;
    let registros = Arc::new(registros);

    let datahora: DateTime<Local> = mtime.into();
    let ultima_atualizacao = datahora.format("%d/%m/%Y %H:%M").to_string();

    eprintln!(
        "Base carregada: {} registros de {:?}",
        registros.len(),
        caminho
    );

    let mut guard = cache.lock().expect("mutex do cache da base envenenado");
    *guard = Some(BaseCacheada {
        caminho,
        mtime,
        registros: Arc::clone(&registros),
        ultima_atualizacao: ultima_atualizacao.clone(),
    });

    Ok((registros, ultima_atualizacao))
}
