use sqlx::PgConnection;
use uuid::Uuid;

use crate::common::error::AppError;

// ---
// Helper RLS: A "Chave" para o Banco de Dados
// ---
/// Define `app.tenant_id` na transação corrente, para que as políticas de RLS
/// só enxerguem as linhas da loja configurada.
pub(crate) async fn scope_to_tenant(
    conn: &mut PgConnection,
    tenant_id: Uuid,
) -> Result<(), AppError> {
    // O `true` limita a configuração à transação atual
    sqlx::query("SELECT set_config('app.tenant_id', $1, true)")
        .bind(tenant_id.to_string())
        .execute(&mut *conn)
        .await?; // Se falhar, vira AppError::DatabaseError automaticamente

    Ok(())
}
